//! Response handling.
//!
//! # Responsibilities
//! - Turn a gate [`Reply`] into an HTTP response
//!
//! # Design Decisions
//! - Status and body are written exactly as the gate returned them
//! - Body is sent as `text/plain; charset=utf-8`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::gate::Reply;

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match StatusCode::from_u16(self.status) {
            Ok(status) => (status, self.body).into_response(),
            Err(_) => {
                tracing::error!(status = self.status, "Upstream produced an invalid status code");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
