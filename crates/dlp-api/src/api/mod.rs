//! REST API over the vault store and the math/estimator helpers

mod handlers;
mod middleware;
pub mod responses;
mod routes;

pub use routes::*;

use crate::config::{ApiConfig, ApiServiceConfig};
use crate::request::{RateLimiter, ResponseCache};
use anyhow::Result;
use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use dlp_core::VaultStore;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{Mutex, RwLock};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Shared API state. Constructed once per process (or per test) and passed
/// to the router; nothing here is a global.
#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<RwLock<VaultStore>>,
    pub rate_limiter: Arc<Mutex<RateLimiter>>,
    pub cache: Arc<Mutex<ResponseCache>>,
    pub client_ip_headers: Arc<Vec<String>>,
}

impl ApiState {
    pub fn new(config: &ApiServiceConfig) -> Self {
        Self::with_store(VaultStore::new(), config)
    }

    pub fn with_store(store: VaultStore, config: &ApiServiceConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(&config.rate_limit))),
            cache: Arc::new(Mutex::new(ResponseCache::new(Duration::from_secs(
                config.api.cache_ttl_secs,
            )))),
            client_ip_headers: Arc::new(config.rate_limit.client_ip_headers.clone()),
        }
    }
}

/// Start the API server
pub async fn start_server(state: ApiState, config: &ApiConfig) -> Result<tokio::task::JoinHandle<()>> {
    let app = create_app(state, config);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("API server listening on {}", config.bind_address);

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("API server error: {}", e);
        }
    });

    Ok(handle)
}

/// Routes plus rate limiting, without transport layers
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .merge(create_vault_routes())
        .merge(create_position_routes())
        .merge(create_market_routes())
        .merge(create_math_routes())
        .route("/health", get(health_handler))
        .layer(from_fn_with_state(state.clone(), middleware::rate_limit))
        .with_state(state)
}

/// The full application with tracing, timeout and CORS layers
pub fn create_app(state: ApiState, config: &ApiConfig) -> Router {
    let app = create_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(Duration::from_secs(config.request_timeout_secs))),
    );

    if config.enable_cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Health check handler
async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "service": "dlp-api"
    }))
}
