/*
 * Responsibility
 * - Shared context bound to the Router (AppState)
 * - Clone is expected to be cheap (Arc / pool handles inside)
 */
use std::sync::Arc;

use crate::services::auth::Authenticator;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub auth: Arc<Authenticator>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, auth: Arc<Authenticator>) -> Self {
        Self { db, auth }
    }
}
