//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::gate::KeyPolicy;

/// Root configuration for the request gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Admission settings.
    pub gate: AdmissionConfig,

    /// The static application behind the gate.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Admission control settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdmissionConfig {
    /// Admitted requests allowed per route key. 0 rejects everything.
    pub ceiling: u64,

    /// How requests map to counters.
    pub key_policy: KeyPolicy,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            ceiling: 2,
            key_policy: KeyPolicy::Path,
        }
    }
}

/// Upstream application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Known (path, method) pairs and their fixed replies.
    pub routes: Vec<UpstreamRouteConfig>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            routes: vec![
                UpstreamRouteConfig {
                    path: "/app/status".to_string(),
                    method: "GET".to_string(),
                    status: 200,
                    body: "Ok".to_string(),
                },
                UpstreamRouteConfig {
                    path: "/create/user".to_string(),
                    method: "POST".to_string(),
                    status: 200,
                    body: "User Created Success!".to_string(),
                },
            ],
        }
    }
}

/// A single fixed upstream reply.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamRouteConfig {
    /// Exact request path.
    pub path: String,

    /// HTTP method (e.g., "GET").
    #[serde(default = "default_method")]
    pub method: String,

    /// Status code returned.
    #[serde(default = "default_status")]
    pub status: u16,

    /// Response body returned.
    #[serde(default)]
    pub body: String,
}

fn default_method() -> String {
    "GET".to_string()
}

fn default_status() -> u16 {
    200
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
