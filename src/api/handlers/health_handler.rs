//! Health check handlers.

use axum::{extract::State, middleware, routing::get, Router};

use crate::api::middleware::auth_middleware;
use crate::api::AppState;

/// Create health check routes
pub fn health_check_routes(state: AppState) -> Router<AppState> {
    Router::new().route("/", get(greet)).route(
        "/secured",
        get(greet_secured).route_layer(middleware::from_fn_with_state(state, auth_middleware)),
    )
}

/// Greeting, confirms the API is up
#[utoipa::path(
    get,
    path = "/health-check",
    tag = "Health Check",
    responses(
        (status = 200, description = "Greeting", body = String, example = json!("Hello product-catalog App."))
    )
)]
pub async fn greet(State(state): State<AppState>) -> String {
    format!("Hello {} App.", state.config.app_name)
}

/// Greeting behind the token check
#[utoipa::path(
    get,
    path = "/health-check/secured",
    tag = "Health Check",
    responses(
        (status = 200, description = "Greeting", body = String),
        (status = 401, description = "Missing or wrong token")
    ),
    security(("token_auth" = []))
)]
pub async fn greet_secured(State(state): State<AppState>) -> String {
    format!("Hello, secured endpoint on {} App.", state.config.app_name)
}
