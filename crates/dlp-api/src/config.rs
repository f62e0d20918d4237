//! Configuration management for the DLP API service

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiServiceConfig {
    #[validate]
    pub api: ApiConfig,
    #[validate]
    pub rate_limit: RateLimitConfig,
    #[validate]
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    pub bind_address: String,
    pub enable_cors: bool,
    #[validate(range(min = 5, max = 300))]
    pub request_timeout_secs: u64,
    /// Lifetime of memoized list responses; 0 disables the cache
    #[validate(range(max = 3600))]
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RateLimitConfig {
    #[validate(range(min = 1000, max = 3_600_000))]
    pub window_ms: u64,
    #[validate(range(min = 1, max = 100_000))]
    pub max_requests: u32,
    #[validate(range(min = 1, max = 1_000_000))]
    pub max_tracked_clients: usize,
    /// Headers consulted in order for the client identity
    #[validate(length(min = 1))]
    pub client_ip_headers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: String,
    pub structured_logging: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            enable_cors: true,
            request_timeout_secs: 30,
            cache_ttl_secs: 30,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: 60_000,
            max_requests: 100,
            max_tracked_clients: 10_000,
            client_ip_headers: vec![
                "x-forwarded-for".to_string(),
                "x-real-ip".to_string(),
                "cf-connecting-ip".to_string(),
            ],
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl ApiServiceConfig {
    /// Load configuration from file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path))?;

        config.check()?;

        Ok(config)
    }

    /// Range checks plus the semantic checks derive macros cannot express
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        self.api
            .bind_address
            .parse::<SocketAddr>()
            .with_context(|| format!("Invalid bind address: {}", self.api.bind_address))?;
        if self.rate_limit.client_ip_headers.iter().any(|h| h.trim().is_empty()) {
            return Err(anyhow::anyhow!("Client IP header names cannot be empty"));
        }
        if self.monitoring.log_level.parse::<tracing::Level>().is_err() {
            return Err(anyhow::anyhow!("Unknown log level: {}", self.monitoring.log_level));
        }
        Ok(())
    }
}
