//! The request gate.
//!
//! Sits in front of an [`UpstreamHandler`] and admits at most `ceiling`
//! requests per route key for the lifetime of the gate.

use axum::http::Method;

use crate::gate::counts::{Admission, RequestCounts};
use crate::gate::key::KeyPolicy;
use crate::gate::upstream::{Reply, UpstreamHandler};
use crate::observability::metrics;

/// Admission control in front of an upstream handler.
#[derive(Debug)]
pub struct RequestGate<U> {
    upstream: U,
    ceiling: u64,
    policy: KeyPolicy,
    counts: RequestCounts,
}

impl<U: UpstreamHandler> RequestGate<U> {
    /// Create a gate with an empty counter table, keyed by path.
    ///
    /// A ceiling of 0 rejects every request.
    pub fn new(upstream: U, ceiling: u64) -> Self {
        Self {
            upstream,
            ceiling,
            policy: KeyPolicy::default(),
            counts: RequestCounts::new(),
        }
    }

    /// Use `policy` to derive counter keys.
    pub fn with_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Admit and forward the request, or reject it with 403.
    ///
    /// Rejected requests are neither counted nor forwarded. Admitted requests
    /// get the upstream reply unchanged.
    pub fn handle(&self, route: &str, method: &Method) -> Reply {
        let key = self.policy.key_for(route, method);

        match self.counts.try_admit(key, self.ceiling) {
            Admission::Rejected { count } => {
                tracing::warn!(
                    route = %route,
                    method = %method,
                    count,
                    ceiling = self.ceiling,
                    "Request ceiling reached, rejecting"
                );
                metrics::record_rejected(route);
                Reply::not_allowed()
            }
            Admission::Admitted { count } => {
                tracing::debug!(
                    route = %route,
                    method = %method,
                    count,
                    ceiling = self.ceiling,
                    "Request admitted"
                );
                metrics::record_admitted(self.counts.len());
                self.upstream.handle(route, method)
            }
        }
    }

    /// Admitted count for the key this request would be counted against.
    pub fn admitted(&self, route: &str, method: &Method) -> u64 {
        self.counts.get(&self.policy.key_for(route, method))
    }

    pub fn ceiling(&self) -> u64 {
        self.ceiling
    }

    pub fn key_policy(&self) -> KeyPolicy {
        self.policy
    }

    /// Number of distinct keys that have been admitted at least once.
    pub fn tracked_routes(&self) -> usize {
        self.counts.len()
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }
}
