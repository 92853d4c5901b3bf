//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate the final configuration
//! - Install the metrics exporter when enabled
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{validate_config, ConfigError, GateConfig};
use crate::http::{HttpServer, ServerError};
use crate::observability::metrics;

/// Error type for startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid metrics address: {0}")]
    MetricsAddress(#[from] AddrParseError),

    #[error("Failed to install metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Run the gate until `shutdown` fires or Ctrl+C arrives.
pub async fn start(
    config: GateConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        bind_address = %config.listener.bind_address,
        ceiling = config.gate.ceiling,
        key_policy = %config.gate.key_policy,
        upstream_routes = config.upstream.routes.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(ServerError::Bind)?;

    HttpServer::new(config).run(listener, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
