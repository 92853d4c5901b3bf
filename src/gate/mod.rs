//! Admission control subsystem.
//!
//! # Data Flow
//! ```text
//! handle(route, method)
//!     → key.rs (derive RouteKey from the configured KeyPolicy)
//!     → counts.rs (atomic check-then-increment against the ceiling)
//!         → Rejected: 403 "Not Allowed", upstream untouched
//!         → Admitted: upstream.rs (UpstreamHandler::handle)
//!     → Reply returned verbatim to the caller
//! ```
//!
//! # Design Decisions
//! - One ceiling shared by every route, fixed at construction
//! - Counters only grow; there is no window, expiry or reset
//! - Rejections never touch the counter
//! - Upstream is called outside of any counter lock

pub mod counts;
pub mod key;
pub mod request_gate;
pub mod upstream;

pub use counts::{Admission, RequestCounts};
pub use key::{KeyPolicy, RouteKey};
pub use request_gate::RequestGate;
pub use upstream::{
    upstream_fn, Reply, SharedUpstream, StaticApplication, UpstreamFn, UpstreamHandler,
};
