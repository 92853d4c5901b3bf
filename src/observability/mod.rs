//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gate and HTTP surface produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging for machine parsing
//! - Request ID flows through every HTTP log line
//! - Metrics go through the `metrics` facade and are no-ops until a
//!   recorder is installed

pub mod logging;
pub mod metrics;
