pub mod require;

pub use require::{RequirePermission, require_permission};
