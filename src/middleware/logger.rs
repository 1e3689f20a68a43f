use axum::{
    http::{HeaderMap, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Logs every request with a trace id, echoed back in `x-request-id`.
pub async fn logger<B>(req: Request<B>, next: Next<B>) -> Response {
    let trace_id = request_id_from(req.headers()).unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let mut response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_millis();

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    if status.is_server_error() {
        error!(trace_id = %trace_id, method = %method, uri = %uri, status = status.as_u16(), elapsed_ms, "Request failed");
    } else if status.is_client_error() {
        warn!(trace_id = %trace_id, method = %method, uri = %uri, status = status.as_u16(), elapsed_ms, "Request rejected");
    } else {
        info!(trace_id = %trace_id, method = %method, uri = %uri, status = status.as_u16(), elapsed_ms, "Request log");
    }
    response
}

/// Incoming `x-request-id`, if it is a sane token.
fn request_id_from(headers: &HeaderMap) -> Option<String> {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= 128)
        .map(str::to_string)
}
