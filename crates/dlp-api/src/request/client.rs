//! Client identity for rate limiting

use axum::http::HeaderMap;

/// Identity used when no forwarded-IP header is present
pub const UNKNOWN_CLIENT: &str = "unknown";

/// First non-empty value among `header_names`, in priority order.
///
/// Comma-separated headers such as `x-forwarded-for` contribute their first
/// entry (the originating client).
pub fn client_identity(headers: &HeaderMap, header_names: &[String]) -> String {
    header_names
        .iter()
        .filter_map(|name| headers.get(name.as_str()))
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(',').next())
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}
