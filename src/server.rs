//! HTTP server assembly: routes, middleware stack, listener and serve loop.
//!
//! The server is stateless. [`router`] builds the full application, [`bind`]
//! opens the listener (the only fallible startup step), and [`serve`] runs
//! until the supplied shutdown future resolves, letting in-flight requests
//! finish before returning.

use std::{future::Future, net::SocketAddr};

use anyhow::Context;
use axum::{body::Body, middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultOnResponse, TraceLayer};

use crate::{
    api,
    error::{self, StartupError},
};

/// Build the application router with fallbacks and middleware attached.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(api::health::health))
        .merge(api::worker::router())
        .fallback(error::not_found)
        .method_not_allowed_fallback(error::method_not_allowed)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(api::request_id::make_span::<Body>)
                .on_response(DefaultOnResponse::new().level(tracing::Level::INFO)),
        )
        // Outermost, so the span above already sees the settled request ID.
        .layer(middleware::from_fn(api::request_id::request_id_middleware))
}

/// Bind the HTTP listener. Failure here is fatal and never retried.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener, StartupError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}

/// Serve [`router`] on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await
        .context("HTTP server error")
}
