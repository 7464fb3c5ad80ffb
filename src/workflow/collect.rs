//! Evidence collection and two-stage evaluation

use crate::clients::Backends;
use crate::engine::DecisionPolicy;
use crate::models::{Decision, Evidence, SessionKey};
use crate::{Context, Result};

/// Fetch intent, telemetry and logs for one session and assemble the evidence
///
/// The three lookups run concurrently; the first failure aborts the collection.
pub async fn collect_evidence(
    backends: &Backends,
    key: &SessionKey,
    log_minutes: u32,
    log_limit: u32,
) -> Result<Evidence> {
    let (intent, telemetry, logs) = tokio::try_join!(
        async {
            backends
                .intent
                .intent_record(key)
                .await
                .context("Failed to fetch source-of-truth intent")
        },
        async {
            backends
                .telemetry
                .snapshot(key)
                .await
                .context("Failed to fetch BGP telemetry")
        },
        async {
            backends
                .logs
                .logs(&key.device, &key.peer_address, log_minutes, log_limit)
                .await
                .context("Failed to fetch device logs")
        },
    )?;

    tracing::debug!(
        device = %key.device,
        peer_address = %key.peer_address,
        found = intent.found,
        log_lines = logs.len(),
        "evidence collected"
    );

    Ok(Evidence::new(key.clone(), intent, telemetry, logs))
}

/// Intent gates first, telemetry second
///
/// Stage one evaluates without telemetry so that any Stop/Skip from the
/// source of truth wins before metrics are considered.
pub fn evaluate_two_stage(policy: &DecisionPolicy, evidence: &Evidence) -> Decision {
    let gate = policy.evaluate(evidence.intent(), None);
    if gate.is_terminal() {
        return gate;
    }
    policy.evaluate(evidence.intent(), Some(evidence.telemetry()))
}
