//! Prometheus metrics: HTTP instrumentation plus business counters.

use std::sync::OnceLock;
use std::time::Instant;

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the Prometheus recorder. Call once at startup; metrics emitted
/// before this are dropped.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .set_buckets(&[0.001, 0.005, 0.01, 0.05, 0.1, 0.2, 0.5, 1.0, 2.0, 5.0])
        .expect("histogram buckets must be non-empty")
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    if RECORDER.set(handle).is_err() {
        panic!("metrics recorder installed twice");
    }
}

/// Counts requests and times them, labelled by method, matched route
/// template, and status. The route template keeps cardinality bounded:
/// `/api/v1/products/:id`, not one series per id.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().as_str().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let response = next.run(req).await;

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => route.clone(),
        "status" => response.status().as_u16().to_string(),
    )
    .increment(1);
    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => route,
    )
    .record(started.elapsed().as_secs_f64());

    response
}

/// GET /metrics in Prometheus text exposition format.
pub async fn metrics_handler() -> impl IntoResponse {
    match RECORDER.get() {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        ),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            [(header::CONTENT_TYPE, "text/plain")],
            "Metrics recorder not installed".to_string(),
        ),
    }
}

pub fn record_invite_sent() {
    counter!("invites_sent_total").increment(1);
}

pub fn record_invite_accepted() {
    counter!("invites_accepted_total").increment(1);
}

pub fn record_sale_recorded(commission_cents: i64) {
    counter!("sales_recorded_total").increment(1);
    counter!("commission_cents_total").increment(commission_cents.max(0) as u64);
}

pub fn record_link_click() {
    counter!("tracking_link_clicks_total").increment(1);
}
