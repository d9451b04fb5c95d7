//! HTTP API for liveness checks and automation metrics.

use axum::{Json, Router, extract::State, routing::get};
use nexus_automation::{AutomationMetrics, MetricsSnapshot};
use nexus_error::{ConfigError, NexusResult};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::info;

/// API state: the shared automation counters.
#[derive(Clone)]
pub struct ApiState {
    metrics: AutomationMetrics,
    version: String,
}

impl ApiState {
    /// Creates new API state.
    pub fn new(metrics: AutomationMetrics, version: impl Into<String>) -> Self {
        Self {
            metrics,
            version: version.into(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    /// Always true while the process serves requests.
    pub ok: bool,
    /// Seconds since start.
    pub uptime: f64,
    /// Guilds the bot is currently in.
    pub guilds: u64,
}

/// Creates the API router.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .route("/metrics", get(get_metrics))
        .with_state(state)
}

/// Serve the API on `port` until the process exits.
pub async fn serve(port: u16, state: ApiState) -> NexusResult<()> {
    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| ConfigError::new(format!("Cannot bind port {}: {}", port, e)))?;
    info!(port, "HTTP server ready");
    axum::serve(listener, create_router(state))
        .await
        .map_err(|e| ConfigError::new(format!("HTTP server failed: {}", e)))?;
    Ok(())
}

/// Plain-text banner.
pub async fn banner(State(state): State<ApiState>) -> String {
    format!("NEXUS BOT V{} running.", state.version)
}

/// Liveness endpoint.
pub async fn health_check(State(state): State<ApiState>) -> Json<HealthReport> {
    Json(HealthReport {
        ok: true,
        uptime: state.metrics.uptime().as_secs_f64(),
        guilds: state.metrics.guilds(),
    })
}

/// Current metrics snapshot.
pub async fn get_metrics(State(state): State<ApiState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> ApiState {
        ApiState::new(AutomationMetrics::new(), "3.3.1")
    }

    #[tokio::test]
    async fn test_banner_names_version() {
        assert_eq!(banner(State(state())).await, "NEXUS BOT V3.3.1 running.");
    }

    #[tokio::test]
    async fn test_health_reports_guilds() {
        let state = state();
        state.metrics.set_guilds(4);

        let Json(report) = health_check(State(state)).await;
        assert!(report.ok);
        assert_eq!(report.guilds, 4);
        assert!(report.uptime >= 0.0);
    }

    #[tokio::test]
    async fn test_metrics_snapshot() {
        let state = state();
        state.metrics.record_autopost();
        state.metrics.record_highlight();

        let Json(snapshot) = get_metrics(State(state)).await;
        assert_eq!(snapshot.autoposts, 1);
        assert_eq!(snapshot.highlights, 1);
        assert_eq!(snapshot.handler_failures, 0);
    }

    #[test]
    fn test_health_serializes() {
        let report = HealthReport {
            ok: true,
            uptime: 1.5,
            guilds: 2,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["ok"], true);
        assert_eq!(value["guilds"], 2);
    }
}
