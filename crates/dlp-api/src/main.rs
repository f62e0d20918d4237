//! DLP vault dashboard API
//!
//! Serves the vault aggregation store and the tick/yield/gas helpers over HTTP.

use anyhow::Result;
use clap::Parser;
use dlp_api::{api, ApiServiceConfig, ApiState};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dlp-api")]
#[command(about = "DLP vault dashboard API")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "dlp-api.toml")]
    config: String,

    /// Override log level
    #[arg(long)]
    log_level: Option<String>,

    /// Dry run mode (validate config and exit)
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_missing = !std::path::Path::new(&cli.config).exists();
    let mut config = if config_missing {
        ApiServiceConfig::default()
    } else {
        ApiServiceConfig::from_file(&cli.config)?
    };

    if let Some(log_level) = cli.log_level {
        config.monitoring.log_level = log_level;
    }

    init_logging(&config)?;

    if config_missing {
        warn!("Config file not found, using defaults: {}", cli.config);
    }

    info!("Starting DLP API");
    info!(
        "Rate limit: {} requests per {}ms",
        config.rate_limit.max_requests, config.rate_limit.window_ms
    );

    config.check()?;
    info!("Configuration validated successfully");

    if cli.dry_run {
        info!("Dry run mode - configuration is valid, exiting");
        return Ok(());
    }

    let state = ApiState::new(&config);
    let api_server = api::start_server(state, &config.api).await?;

    info!("API started. Press Ctrl+C to shutdown.");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
        result = api_server => {
            if let Err(e) = result {
                error!("API server task error: {}", e);
            }
        }
    }

    info!("Shutting down DLP API");
    Ok(())
}

fn init_logging(config: &ApiServiceConfig) -> Result<()> {
    let log_level = config
        .monitoring
        .log_level
        .parse()
        .unwrap_or(tracing::Level::INFO);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("dlp_api={},dlp_core={},tower_http=info", log_level, log_level).into());

    if config.monitoring.structured_logging {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Ok(())
}
