//! Prometheus metrics
//!
//! The recorder is installed once per process. Recording before
//! [`init_metrics`] is a no-op.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use vidya_quality::Assessment;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder; later calls return the same handle
pub fn init_metrics() -> Option<PrometheusHandle> {
    HANDLE
        .get_or_try_init(|| PrometheusBuilder::new().install_recorder())
        .map(Clone::clone)
        .map_err(|e| tracing::warn!(error = %e, "Failed to install Prometheus recorder"))
        .ok()
}

/// GET /metrics
pub async fn metrics_handler() -> impl IntoResponse {
    match HANDLE.get() {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::SERVICE_UNAVAILABLE,
            "metrics recorder not installed".to_string(),
        ),
    }
}

pub fn record_request(route: &str, status: StatusCode) {
    metrics::counter!(
        "vidya_http_requests_total",
        "route" => route.to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
}

pub fn record_quality_score(assessment: &Assessment, language: &str) {
    let language = language.to_string();
    metrics::counter!("vidya_quality_scores_total", "language" => language.clone()).increment(1);
    metrics::histogram!("vidya_quality_overall_score", "language" => language.clone())
        .record(assessment.score.overall_score);
    if assessment.is_degraded() {
        metrics::counter!("vidya_quality_degraded_total", "language" => language).increment(1);
    }
}
