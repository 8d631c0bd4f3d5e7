// src/metrics/server.rs

//! HTTP exposition of the Prometheus registry on `/metrics`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::PrometheusMetrics;

/// Routes served by the metrics listener.
pub fn router(metrics: Arc<PrometheusMetrics>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

/// Bind the metrics listener. Done before anything is launched so a taken
/// port fails startup instead of surfacing later.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding metrics listener on {addr}"))
}

/// Serve `/metrics` on `listener` until `cancel` fires.
pub async fn serve(
    listener: TcpListener,
    metrics: Arc<PrometheusMetrics>,
    cancel: CancellationToken,
) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(addr = %addr, "serving metrics on /metrics");
    }

    axum::serve(listener, router(metrics))
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await
        .context("metrics server failed")
}

async fn metrics_handler(State(metrics): State<Arc<PrometheusMetrics>>) -> Response {
    match metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
