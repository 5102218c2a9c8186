//! Liveness probe endpoint.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// Body of `GET /health`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: &'static str,
}

impl HealthStatus {
    pub const OK: Self = Self { status: "ok" };
}

/// `GET /health` — always returns 200 OK with `{"status": "ok"}`.
///
/// This endpoint has no dependencies and never blocks, making it safe to use
/// as a Docker / Kubernetes liveness probe.
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthStatus::OK))
}
