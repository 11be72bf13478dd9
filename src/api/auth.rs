use super::AppState;
use crate::errors::ApiError;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;

const BEARER_PREFIX: &str = "Bearer ";

/// Route layer for mutating endpoints. Runs before the body is read.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    let token = bearer_token(header).ok_or(ApiError::MalformedAuthorization)?;

    if !bool::from(token.as_bytes().ct_eq(state.api_token.as_bytes())) {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "rejected request with invalid bearer token"
        );
        return Err(ApiError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// The token is the second space-separated segment, so "Bearer a b" yields "a"
/// and "Bearer " yields an empty token.
fn bearer_token(header: &str) -> Option<&str> {
    if !header.starts_with(BEARER_PREFIX) {
        return None;
    }
    header.split(' ').nth(1)
}
