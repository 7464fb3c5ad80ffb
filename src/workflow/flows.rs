//! Quarantine and resolved flows
//!
//! Every run annotates its decision, Skip and Stop included. Only a Proceed
//! decision creates a silence, and the silence gets its own annotation.

use super::collect::{collect_evidence, evaluate_two_stage};
use crate::clients::{Backends, Labels};
use crate::engine::DecisionPolicy;
use crate::models::config::WorkflowConfig;
use crate::models::{Decision, EvidenceSummary, Outcome, SessionKey};
use crate::{Context, Result};
use serde::Serialize;
use uuid::Uuid;

/// Remediation action taken by a flow run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowAction {
    None,
    Quarantine,
}

/// Outcome of one quarantine flow run
#[derive(Debug, Clone, Serialize)]
pub struct FlowReport {
    pub run_id: Uuid,
    pub device: String,
    pub peer_address: String,
    pub action: FlowAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub silence_id: Option<String>,
    pub decision: Decision,
    pub evidence_summary: EvidenceSummary,
}

/// Outcome of one resolved flow run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedReport {
    pub run_id: Uuid,
    pub device: String,
    pub peer_address: String,
}

/// Annotation labels shared by every flow; `decision` is added per event
pub fn base_labels(settings: &WorkflowConfig, key: &SessionKey) -> Labels {
    Labels::from([
        ("source".to_string(), settings.source.clone()),
        ("workflow".to_string(), settings.name.clone()),
        ("device".to_string(), key.device.clone()),
        ("peer_address".to_string(), key.peer_address.clone()),
    ])
}

/// Labels for a decision annotation
pub fn decision_labels(settings: &WorkflowConfig, key: &SessionKey, decision: &str) -> Labels {
    let mut labels = base_labels(settings, key);
    labels.insert("decision".to_string(), decision.to_string());
    labels
}

/// Collect, decide, annotate and (on Proceed) silence the alert
pub async fn quarantine_flow(
    backends: &Backends,
    settings: &WorkflowConfig,
    key: &SessionKey,
) -> Result<FlowReport> {
    let run_id = Uuid::new_v4();
    tracing::info!(%run_id, device = %key.device, peer_address = %key.peer_address, "quarantine flow started");

    let evidence = collect_evidence(backends, key, settings.log_minutes, settings.log_limit).await?;
    let evidence_summary = evidence.summary();

    let policy = DecisionPolicy::new(settings.strict);
    let decision = evaluate_two_stage(&policy, &evidence);

    tracing::info!(
        %run_id,
        device = %key.device,
        peer_address = %key.peer_address,
        outcome = %decision.outcome(),
        reason = decision.reason(),
        hint = %evidence_summary.bgp_metrics_hint,
        "decision reached"
    );

    backends
        .audit
        .annotate(
            &decision_labels(settings, key, decision.outcome().name()),
            decision.reason(),
        )
        .await
        .context("Failed to annotate decision")?;

    let mut action = FlowAction::None;
    let mut silence_id = None;

    if decision.outcome() == Outcome::Proceed {
        let payload = evidence.remediation_payload(settings.max_payload_log_lines);
        tracing::debug!(
            %run_id,
            payload = %serde_json::to_string(&payload).unwrap_or_default(),
            "remediation payload"
        );

        let id = backends
            .silences
            .create_suppression(&key.device, &key.peer_address, settings.quarantine_minutes)
            .await
            .context("Failed to create quarantine silence")?;

        backends
            .audit
            .annotate(
                &base_labels(settings, key),
                &format!("QUARANTINE applied (silence_id={})", id),
            )
            .await
            .context("Failed to annotate quarantine action")?;

        tracing::info!(%run_id, silence_id = %id, minutes = settings.quarantine_minutes, "quarantine applied");
        action = FlowAction::Quarantine;
        silence_id = Some(id);
    }

    Ok(FlowReport {
        run_id,
        device: key.device.clone(),
        peer_address: key.peer_address.clone(),
        action,
        silence_id,
        decision,
        evidence_summary,
    })
}

/// Record that the alert resolved
pub async fn resolved_flow(
    backends: &Backends,
    settings: &WorkflowConfig,
    key: &SessionKey,
) -> Result<ResolvedReport> {
    let run_id = Uuid::new_v4();

    backends
        .audit
        .annotate(&decision_labels(settings, key, "resolved"), "Alert resolved")
        .await
        .context("Failed to annotate resolution")?;

    tracing::info!(%run_id, device = %key.device, peer_address = %key.peer_address, "alert resolved");

    Ok(ResolvedReport {
        run_id,
        device: key.device.clone(),
        peer_address: key.peer_address.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_labels() {
        let settings = WorkflowConfig::default();
        let key = SessionKey::new("r1", "10.0.0.2");
        let labels = decision_labels(&settings, &key, "proceed");

        assert_eq!(labels.len(), 5);
        assert_eq!(labels["source"], "bgptriage");
        assert_eq!(labels["workflow"], "demo_quarantine_bgp");
        assert_eq!(labels["decision"], "proceed");
    }

    #[test]
    fn test_base_labels_have_no_decision() {
        let labels = base_labels(&WorkflowConfig::default(), &SessionKey::new("r1", "10.0.0.2"));
        assert!(!labels.contains_key("decision"));
        assert_eq!(labels["peer_address"], "10.0.0.2");
    }

    #[test]
    fn test_flow_action_serialization() {
        assert_eq!(serde_json::to_value(FlowAction::None).unwrap(), "none");
        assert_eq!(serde_json::to_value(FlowAction::Quarantine).unwrap(), "quarantine");
    }
}
