//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router sending every path and method to the gate
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a bound listener with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{Method, Uri},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::GateConfig;
use crate::gate::{RequestGate, SharedUpstream, StaticApplication};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::shutdown_signal;
use crate::observability::metrics;

/// Gate shared between request handlers.
pub type SharedGate = Arc<RequestGate<SharedUpstream>>;

/// Error type for the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind: {0}")]
    Bind(std::io::Error),

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub gate: SharedGate,
}

/// HTTP server exposing a [`RequestGate`].
pub struct HttpServer {
    router: Router,
    gate: SharedGate,
}

impl HttpServer {
    /// Create a server gating the static application from `config`.
    pub fn new(config: GateConfig) -> Self {
        let upstream: SharedUpstream =
            Arc::new(StaticApplication::from_config(&config.upstream.routes));
        let gate = RequestGate::new(upstream, config.gate.ceiling)
            .with_key_policy(config.gate.key_policy);

        Self::with_gate(Arc::new(gate), &config)
    }

    /// Create a server around an existing gate.
    ///
    /// Only the timeout settings of `config` are used.
    pub fn with_gate(gate: SharedGate, config: &GateConfig) -> Self {
        let state = AppState { gate: gate.clone() };
        let router = Self::build_router(config, state);
        Self { router, gate }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &GateConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(SetRequestIdLayer::new(X_REQUEST_ID.clone(), MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID.clone()))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));

        Router::new()
            .route("/{*path}", any(gate_handler))
            .route("/", any(gate_handler))
            .with_state(state)
            .layer(middleware)
    }

    /// The gate behind this server.
    pub fn gate(&self) -> &SharedGate {
        &self.gate
    }

    /// Consume the server and return its router, e.g. to drive it in-process.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until `shutdown` fires or Ctrl+C arrives.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr().map_err(ServerError::Bind)?;
        tracing::info!(
            address = %addr,
            ceiling = self.gate.ceiling(),
            key_policy = %self.gate.key_policy(),
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main gate handler.
/// Uses the request path as the route and hands it to the gate.
async fn gate_handler(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let start_time = Instant::now();
    let reply = state.gate.handle(uri.path(), &method);

    tracing::debug!(
        method = %method,
        path = %uri.path(),
        status = reply.status,
        "Request handled"
    );
    metrics::record_request(method.as_str(), reply.status, start_time);

    reply.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn send(router: &Router, method: Method, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_router_runs_sample_scenario() {
        let router = HttpServer::new(GateConfig::default()).into_router();

        assert_eq!(
            send(&router, Method::GET, "/app/status").await,
            (StatusCode::OK, "Ok".to_string())
        );
        assert_eq!(
            send(&router, Method::GET, "/app/status").await,
            (StatusCode::OK, "Ok".to_string())
        );
        assert_eq!(
            send(&router, Method::GET, "/app/status").await,
            (StatusCode::FORBIDDEN, "Not Allowed".to_string())
        );
        assert_eq!(
            send(&router, Method::POST, "/create/user").await,
            (StatusCode::OK, "User Created Success!".to_string())
        );
    }

    #[tokio::test]
    async fn test_query_string_is_not_part_of_route() {
        let mut config = GateConfig::default();
        config.gate.ceiling = 1;
        let server = HttpServer::new(config);
        let gate = server.gate().clone();
        let router = server.into_router();

        send(&router, Method::GET, "/app/status?a=1").await;
        let (status, _) = send(&router, Method::GET, "/app/status?a=2").await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(gate.admitted("/app/status", &Method::GET), 1);
    }

    #[tokio::test]
    async fn test_root_path_is_gated() {
        let router = HttpServer::new(GateConfig::default()).into_router();

        assert_eq!(
            send(&router, Method::GET, "/").await,
            (StatusCode::NOT_FOUND, "404 Not Found".to_string())
        );
    }

    #[tokio::test]
    async fn test_response_carries_request_id() {
        let router = HttpServer::new(GateConfig::default()).into_router();

        let request = Request::builder()
            .uri("/app/status")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "abc-123");
    }
}
