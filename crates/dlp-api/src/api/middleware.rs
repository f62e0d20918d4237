//! Request middleware

use super::ApiState;
use crate::error::ApiError;
use crate::request::client_identity;
use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::warn;

const EXEMPT_PATHS: &[&str] = &["/health"];

/// Reject requests over the per-client budget with 429
pub async fn rate_limit(
    State(state): State<ApiState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if EXEMPT_PATHS.contains(&request.uri().path()) {
        return Ok(next.run(request).await);
    }

    let client = client_identity(request.headers(), &state.client_ip_headers);
    let decision = state.rate_limiter.lock().await.check(&client);
    if !decision.allowed {
        warn!(client = %client, path = %request.uri().path(), "Rate limit exceeded");
    }
    let decision = decision.into_result()?;

    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    Ok(response)
}
