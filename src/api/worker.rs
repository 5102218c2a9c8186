//! Worker endpoints (`/worker/*`).

use axum::{response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

/// Body of `GET /worker/hello`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Greeting {
    pub message: &'static str,
}

impl Greeting {
    pub const HELLO: Self = Self {
        message: "Hello from Python worker",
    };
}

/// Worker routes, merged into the top-level router.
pub fn router() -> Router {
    Router::new().route("/worker/hello", get(hello))
}

/// `GET /worker/hello` — static greeting, always 200.
pub async fn hello() -> impl IntoResponse {
    Json(Greeting::HELLO)
}
