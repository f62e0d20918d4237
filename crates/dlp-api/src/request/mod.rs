//! Request shaping utilities used by the route handlers
//!
//! - Deterministic cache keys and a revision-checked response cache
//! - Pagination parsing with clamping
//! - Client identity and fixed-window rate limiting

pub mod cache;
pub mod cache_key;
pub mod client;
pub mod pagination;
pub mod rate_limit;

pub use cache::ResponseCache;
pub use cache_key::{generate_cache_key, CacheParam};
pub use client::{client_identity, UNKNOWN_CLIENT};
pub use pagination::{parse_pagination, Pagination};
pub use rate_limit::{RateLimitDecision, RateLimiter};
