//! Request id propagation for log correlation.

use axum::{
    body::Body,
    http::{header::HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id available to handlers through request extensions.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// Honors an incoming `x-request-id` header, minting a fresh UUID when the
/// caller sent none. The id rides the request span, the extensions, and the
/// response headers.
pub async fn trace_id(mut req: Request<Body>, next: Next) -> Response {
    let request_id = incoming_id(&req).unwrap_or_else(|| Uuid::new_v4().to_string());
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let started = std::time::Instant::now();
    let mut response = next.run(req).instrument(span).await;

    tracing::info!(
        request_id = %request_id,
        status = response.status().as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Request completed"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }

    response
}

fn incoming_id(req: &Request<Body>) -> Option<String> {
    let value = req.headers().get(REQUEST_ID_HEADER)?.to_str().ok()?;
    // Ignore absurd ids so a client cannot pollute logs.
    if value.is_empty() || value.len() > 128 {
        return None;
    }
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_with_id(id: &str) -> Request<Body> {
        Request::builder()
            .uri("/")
            .header(REQUEST_ID_HEADER, id)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_incoming_id_is_honored() {
        let req = request_with_id("abc-123");
        assert_eq!(incoming_id(&req), Some("abc-123".to_string()));
    }

    #[test]
    fn test_oversized_id_is_ignored() {
        let req = request_with_id(&"x".repeat(200));
        assert_eq!(incoming_id(&req), None);
    }

    #[test]
    fn test_missing_header_yields_none() {
        let req = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(incoming_id(&req), None);
    }
}
