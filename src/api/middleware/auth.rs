//! Header token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::errors::AppError;

/// Shared token authentication middleware.
///
/// The `Authorization` header must equal the configured token exactly.
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    if token != state.config.auth_token() {
        tracing::warn!(path = %request.uri().path(), "Rejected request with wrong token");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
