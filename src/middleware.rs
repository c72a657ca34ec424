use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::database::AppState;
use crate::error::ApiError;

/// Middleware to check for Authorization header
///
/// When the state carries an API token, the request must contain an
/// `Authorization` header with exactly that value. Without a configured
/// token every request passes through.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.auth_token.as_deref() {
        let provided = headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        if provided != Some(expected) {
            tracing::warn!(path = %request.uri().path(), "rejected request with bad authorization");
            return Err(ApiError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}
