//! `X-Request-ID` correlation for worker requests.
//!
//! [`request_id_middleware`] runs outermost. It settles the ID once, writing
//! it back onto the request headers so every inner layer sees the same value,
//! and echoes it on the response. [`make_span`] is handed to
//! `tower_http::TraceLayer` and stamps the ID on the per-request span, so the
//! TraceLayer's request/response log lines carry it.
//!
//! A caller-supplied ID is kept when it is short printable ASCII; anything
//! else is replaced with a fresh UUID v4.

use axum::{
    extract::Request,
    http::{self, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest caller-supplied ID accepted verbatim.
pub const MAX_REQUEST_ID_LEN: usize = 128;

fn accepted(value: &HeaderValue) -> bool {
    let bytes = value.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= MAX_REQUEST_ID_LEN
        && bytes.iter().all(|b| b.is_ascii_graphic())
}

pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let id = match req.headers().get(&REQUEST_ID_HEADER) {
        Some(value) if accepted(value) => value.clone(),
        Some(_) => {
            tracing::debug!("replacing malformed x-request-id");
            fresh_id()
        }
        None => fresh_id(),
    };

    req.headers_mut().insert(REQUEST_ID_HEADER, id.clone());
    let mut response = next.run(req).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, id);
    response
}

fn fresh_id() -> HeaderValue {
    // A hyphenated UUID is always a valid header value.
    HeaderValue::from_str(&Uuid::new_v4().to_string())
        .unwrap_or_else(|_| HeaderValue::from_static("-"))
}

/// Span factory for `TraceLayer::make_span_with`.
pub fn make_span<B>(req: &http::Request<B>) -> Span {
    let request_id = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %req.method(),
        uri = %req.uri(),
        request_id = %request_id,
    )
}
