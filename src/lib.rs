//! Request gate: per-route admission control in front of an upstream handler.

pub mod config;
pub mod gate;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::GateConfig;
pub use gate::{KeyPolicy, Reply, RequestGate, StaticApplication, UpstreamHandler};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
