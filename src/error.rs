//! Error types for hello-worker.
//!
//! Two families live here:
//!
//! - [`StartupError`] — failures before the first request is served. These are
//!   fatal: `main` propagates them through [`anyhow`] and the process exits
//!   nonzero with the error chain on stderr.
//! - [`ApiError`] — HTTP-level rejections for requests that match no route.
//!   The route handlers themselves never fail; [`ApiError`] only backs the
//!   router fallbacks so that 404 and 405 responses carry a JSON body like
//!   every other response.
//!
//! # Example
//!
//! ```rust,ignore
//! let listener = server::bind(addr).await?; // StartupError -> anyhow::Error
//! ```

use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Fatal errors raised while bringing the server up.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The listener could not bind, usually because the port is already taken.
    #[error("failed to bind HTTP listener on {addr}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Request-level rejection rendered as `{"detail": "..."}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Not Found")]
    NotFound,
    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

/// Wire shape of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(status = %self.status(), "request rejected: {self}");
        (
            self.status(),
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Router fallback for paths with no registered route.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Router fallback for known paths hit with an unsupported method.
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}
