//! Request gate server.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌──────────────────────────────────────────────┐
//!                      │                 REQUEST GATE                 │
//!                      │                                              │
//!   Client Request     │  ┌─────────┐    ┌──────────┐    ┌──────────┐ │
//!   ───────────────────┼─▶│  http   │───▶│   gate   │───▶│ upstream │ │
//!                      │  │ server  │    │ counters │    │   app    │ │
//!                      │  └─────────┘    └────┬─────┘    └────┬─────┘ │
//!                      │                      │ 403           │      │
//!   Client Response    │  ┌─────────┐         ▼               │      │
//!   ◀──────────────────┼──│response │◀────────┴───────────────┘      │
//!                      │  └─────────┘                                 │
//!                      │                                              │
//!                      │  config · observability · lifecycle          │
//!                      └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use request_gate::config::{load_config, GateConfig};
use request_gate::gate::KeyPolicy;
use request_gate::lifecycle::{self, Shutdown};
use request_gate::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "request-gate")]
#[command(about = "Per-route request ceiling in front of a static application")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Override the per-route request ceiling.
    #[arg(long)]
    ceiling: Option<u64>,

    /// Override the counter key policy (path, path_and_method).
    #[arg(long)]
    key_policy: Option<KeyPolicy>,

    /// Override the log level.
    #[arg(long)]
    log_level: Option<String>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    fn apply(self, mut config: GateConfig) -> GateConfig {
        if let Some(bind) = self.bind {
            config.listener.bind_address = bind;
        }
        if let Some(ceiling) = self.ceiling {
            config.gate.ceiling = ceiling;
        }
        if let Some(policy) = self.key_policy {
            config.gate.key_policy = policy;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if self.json_logs {
            config.observability.json_logs = true;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GateConfig::default(),
    };
    let config = args.apply(config);

    logging::init_logging(&config.observability)?;

    tracing::info!("request-gate v{} starting", env!("CARGO_PKG_VERSION"));

    let shutdown = Shutdown::new();
    lifecycle::start(config, shutdown.subscribe()).await?;

    Ok(())
}
