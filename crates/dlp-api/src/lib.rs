//! # DLP API
//!
//! HTTP boundary for the vault dashboard: per-client rate limiting,
//! pagination, deterministic cache keys and the REST routes over
//! [`dlp_core::VaultStore`].

pub mod api;
pub mod config;
pub mod error;
pub mod request;

pub use api::{create_app, create_router, start_server, ApiState};
pub use config::ApiServiceConfig;
pub use error::{ApiError, ApiResult};
