use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::gateway::{state::AppState, types::ApiError};

/// Digest from an `Authorization: Bearer <digest>` value.
///
/// Anything else, including a missing header, yields `None`.
pub fn parse_bearer(value: Option<&str>) -> Option<&str> {
    let (scheme, digest) = value?.split_once(' ')?;
    if scheme != "Bearer" || digest.is_empty() || digest.contains(' ') {
        return None;
    }
    Some(digest)
}

/// Verify the bearer credential and hand it to the handler as an extension.
pub async fn bearer_auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(digest) = parse_bearer(value) else {
        tracing::warn!(reason = "MALFORMED_HEADER", "Credential verification failed");
        return Err(ApiError::access_denied());
    };

    let credential = state.auth.verify(digest).await?;
    request.extensions_mut().insert(credential);
    Ok(next.run(request).await)
}
