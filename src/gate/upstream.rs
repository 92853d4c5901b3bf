//! Upstream handlers.
//!
//! # Responsibilities
//! - Define the contract the gate forwards admitted requests to
//! - Provide the static sample application used by the service
//!
//! An upstream is any pure mapping from (route, method) to a [`Reply`]. The
//! gate never inspects or alters what it returns.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;
use serde::Serialize;

use crate::config::UpstreamRouteConfig;

/// Status and body produced for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Reply for a request rejected by the gate.
    pub fn not_allowed() -> Self {
        Self::new(403, "Not Allowed")
    }

    /// Reply for a (route, method) pair the application does not know.
    pub fn not_found() -> Self {
        Self::new(404, "404 Not Found")
    }
}

/// The application sitting behind the gate.
pub trait UpstreamHandler: Send + Sync {
    fn handle(&self, route: &str, method: &Method) -> Reply;
}

/// Type-erased upstream, as held by the HTTP surface.
pub type SharedUpstream = Arc<dyn UpstreamHandler>;

/// Upstream backed by a closure. See [`upstream_fn`].
#[derive(Clone, Copy)]
pub struct UpstreamFn<F>(F);

/// Wrap a closure as an [`UpstreamHandler`].
pub fn upstream_fn<F>(f: F) -> UpstreamFn<F>
where
    F: Fn(&str, &Method) -> Reply + Send + Sync,
{
    UpstreamFn(f)
}

impl<F> UpstreamHandler for UpstreamFn<F>
where
    F: Fn(&str, &Method) -> Reply + Send + Sync,
{
    fn handle(&self, route: &str, method: &Method) -> Reply {
        (self.0)(route, method)
    }
}

impl<F> std::fmt::Debug for UpstreamFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamFn").finish_non_exhaustive()
    }
}

impl<T: UpstreamHandler + ?Sized> UpstreamHandler for Arc<T> {
    fn handle(&self, route: &str, method: &Method) -> Reply {
        (**self).handle(route, method)
    }
}

/// A fixed table of (route, method) → reply.
///
/// Anything not in the table gets [`Reply::not_found`].
#[derive(Debug, Clone, Default)]
pub struct StaticApplication {
    routes: HashMap<String, HashMap<Method, Reply>>,
}

impl StaticApplication {
    /// An application that knows no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// The sample application: a status probe and a user creation endpoint.
    pub fn sample() -> Self {
        Self::new()
            .with_route("/app/status", Method::GET, Reply::new(200, "Ok"))
            .with_route(
                "/create/user",
                Method::POST,
                Reply::new(200, "User Created Success!"),
            )
    }

    /// Add or replace the reply for (route, method).
    pub fn with_route(mut self, route: impl Into<String>, method: Method, reply: Reply) -> Self {
        self.routes
            .entry(route.into())
            .or_default()
            .insert(method, reply);
        self
    }

    /// Build the table from configuration. Entries with an unparsable method
    /// are skipped with a warning; validation rejects them before this runs.
    pub fn from_config(routes: &[UpstreamRouteConfig]) -> Self {
        let mut app = Self::new();
        for route in routes {
            match route.method.parse::<Method>() {
                Ok(method) => {
                    app = app.with_route(
                        route.path.clone(),
                        method,
                        Reply::new(route.status, route.body.clone()),
                    );
                }
                Err(_) => {
                    tracing::warn!(path = %route.path, method = %route.method, "Invalid upstream route method");
                }
            }
        }
        app
    }

    /// Number of (route, method) entries.
    pub fn len(&self) -> usize {
        self.routes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl UpstreamHandler for StaticApplication {
    fn handle(&self, route: &str, method: &Method) -> Reply {
        self.routes
            .get(route)
            .and_then(|methods| methods.get(method))
            .cloned()
            .unwrap_or_else(Reply::not_found)
    }
}
