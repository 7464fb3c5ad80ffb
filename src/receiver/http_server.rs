//! Webhook receiver HTTP server
//!
//! - `POST /alerts` - Alertmanager webhook; runs one flow per alert
//! - `GET /health` - liveness

use super::webhook::{extract_session_fields, AlertGroup};
use crate::clients::Backends;
use crate::models::TriageConfig;
use crate::workflow::{quarantine_flow, resolved_flow, FlowReport, ResolvedReport};
use crate::{Context, Result};
use axum::{extract::State, routing::get, routing::post, Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

// =============================================================================
// Report Models
// =============================================================================

/// What happened to one alert of a group
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum AlertOutcome {
    Quarantine { report: FlowReport },
    Resolved { report: ResolvedReport },
    Skipped { reason: String },
    Failed { device: String, peer_address: String, error: String },
}

/// Response body of `POST /alerts`
#[derive(Debug, Clone, Serialize)]
pub struct ReceiverReport {
    pub alertname: String,
    pub status: String,
    /// False when the alert name is not handled; `alerts` is then empty
    pub handled: bool,
    pub alerts: Vec<AlertOutcome>,
}

impl ReceiverReport {
    pub fn failures(&self) -> usize {
        self.alerts
            .iter()
            .filter(|a| matches!(a, AlertOutcome::Failed { .. }))
            .count()
    }
}

// =============================================================================
// Application State
// =============================================================================

/// State shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub backends: Backends,
    pub config: Arc<TriageConfig>,
}

impl AppState {
    pub fn new(backends: Backends, config: TriageConfig) -> Self {
        Self {
            backends,
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Server
// =============================================================================

/// Routes with tracing and permissive CORS
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/alerts", post(handle_alerts))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn start_server(port: u16, state: AppState) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "webhook receiver listening");

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

async fn handle_alerts(State(state): State<AppState>, Json(group): Json<AlertGroup>) -> Json<ReceiverReport> {
    Json(process_alert_group(&state.backends, &state.config, &group).await)
}

// =============================================================================
// Group Processing
// =============================================================================

/// Run the matching flow for every alert in a group
///
/// A failing flow is recorded against its alert; the rest of the group still runs.
pub async fn process_alert_group(
    backends: &Backends,
    config: &TriageConfig,
    group: &AlertGroup,
) -> ReceiverReport {
    let alertname = group.alertname().unwrap_or("unknown").to_string();
    let handled = config.server.handled_alertnames.iter().any(|n| *n == alertname);

    tracing::info!(
        alertname = %alertname,
        status = %group.status,
        alerts = group.alerts.len(),
        "alert group received"
    );

    let mut report = ReceiverReport {
        alertname,
        status: group.status.clone(),
        handled,
        alerts: Vec::new(),
    };

    if !handled {
        tracing::info!(alertname = %report.alertname, "ignoring unhandled alert");
        return report;
    }

    for alert in &group.alerts {
        let Some(key) = extract_session_fields(&alert.labels) else {
            tracing::warn!(labels = ?alert.labels, "alert missing device or peer label, skipping");
            report.alerts.push(AlertOutcome::Skipped {
                reason: "missing device or peer_address label".to_string(),
            });
            continue;
        };

        let outcome = if alert.is_firing(group) {
            quarantine_flow(backends, &config.workflow, &key)
                .await
                .map(|report| AlertOutcome::Quarantine { report })
        } else {
            resolved_flow(backends, &config.workflow, &key)
                .await
                .map(|report| AlertOutcome::Resolved { report })
        };

        report.alerts.push(outcome.unwrap_or_else(|e| {
            tracing::warn!(device = %key.device, peer_address = %key.peer_address, error = %format!("{:#}", e), "flow failed");
            AlertOutcome::Failed {
                device: key.device.clone(),
                peer_address: key.peer_address.clone(),
                error: format!("{:#}", e),
            }
        }));
    }

    report
}
