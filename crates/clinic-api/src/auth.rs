use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::AppState;

/// Header carrying the shared API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Reject requests whose `x-api-key` does not match the configured key.
///
/// A server started without a key lets every request through.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(expected) = state.api_key.as_deref() {
        let provided = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected) {
            tracing::warn!(path = %request.uri().path(), "rejected request without valid API key");
            return Err(ApiError::Unauthorized);
        }
    }
    Ok(next.run(request).await)
}
