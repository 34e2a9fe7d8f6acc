//! Request logging middleware.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::info;
use std::time::Instant;

/// Logs one `http_request` event per request with status and duration.
pub async fn log_request(req: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    info!(
        "event=http_request module=http method={} path={} status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
