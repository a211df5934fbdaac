/*
 * Responsibility
 * - v1 URL structure
 * - Each protected route names the capability its guard demands; GET /drinks
 *   and /health stay public
 */
use axum::Router;
use axum::handler::Handler;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch};

use crate::api::v1::handlers::{
    drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink},
    health::health,
};
use crate::middleware::auth::{RequirePermission, require_permission};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let guard = |permission: &'static str| {
        from_fn_with_state(
            RequirePermission::new(state.auth.clone(), permission),
            require_permission,
        )
    };

    Router::new()
        .route("/health", get(health))
        .route(
            "/drinks",
            get(list_drinks).post(create_drink.layer(guard("post:drinks"))),
        )
        .route(
            "/drinks-detail",
            get(list_drinks_detail.layer(guard("get:drinks-detail"))),
        )
        .route(
            "/drinks/{drink_id}",
            patch(update_drink.layer(guard("patch:drinks")))
                .delete(delete_drink.layer(guard("delete:drinks"))),
        )
}
