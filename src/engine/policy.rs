//! Intent-vs-reality gating policy
//!
//! 1. stop if the SoT can't find the device
//! 2. skip if the device is in maintenance
//! 3. skip if the peer is not intended
//! 4. skip if the SoT expects the peer down/disabled
//! 5. with the peer expected up:
//!    - metrics missing -> proceed (collect evidence)
//!    - admin enabled and oper up -> skip (healthy)
//!    - strict gate not met -> skip
//!    - otherwise -> proceed (mismatch)
//!
//! Every evaluation is independent and deterministic: the same inputs always
//! produce the same [`Decision`].

use crate::models::decision::{Decision, DecisionDetails};
use crate::models::intent::IntentRecord;
use crate::models::telemetry::TelemetrySnapshot;

const DEFAULT_NOT_FOUND_REASON: &str = "device not found";

/// Gating policy over an intent record and optional telemetry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionPolicy {
    /// Only proceed when admin is enabled but oper is not up
    strict: bool,
}

impl DecisionPolicy {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Policy that refuses to act on administratively disabled peers
    pub fn strict() -> Self {
        Self::new(true)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Evaluate intent and telemetry into a gating decision. Total: never fails.
    pub fn evaluate(&self, intent: &IntentRecord, telemetry: Option<&TelemetrySnapshot>) -> Decision {
        if !intent.found {
            let reason = intent
                .reason
                .as_deref()
                .filter(|r| !r.is_empty())
                .unwrap_or(DEFAULT_NOT_FOUND_REASON);
            return Decision::stop(reason);
        }

        if intent.maintenance {
            return Decision::skip("device under maintenance");
        }

        if !intent.intended_peer {
            return Decision::skip("peer not intended in SoT");
        }

        if intent.expects_down() {
            return Decision::skip("SoT expects down/disabled");
        }

        let Some(telemetry) = telemetry else {
            return Decision::proceed("SoT expects up; metrics not provided");
        };

        let admin = telemetry.admin_code();
        let oper = telemetry.oper_code();
        let admin_ok = admin == 1;
        let oper_ok = oper == 1;

        if admin_ok && oper_ok {
            return Decision::skip("peer matches SoT intent (enabled + up)");
        }

        let details = DecisionDetails {
            admin_state: admin,
            oper_state: oper,
            expected_state: intent.normalized_expected_state(),
        };

        if self.strict && !(admin_ok && !oper_ok) {
            return Decision::skip("metrics gate not met (expected admin_state=enable and oper_state!=up)")
                .with_details(details);
        }

        Decision::proceed("mismatch between intent and reality").with_details(details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::decision::Outcome;

    fn established() -> IntentRecord {
        IntentRecord::intended(Some("established"))
    }

    #[test]
    fn test_stop_uses_collaborator_reason() {
        let policy = DecisionPolicy::default();
        let decision = policy.evaluate(&IntentRecord::not_found("device not found in Nautobot"), None);
        assert_eq!(decision.outcome(), Outcome::Stop);
        assert_eq!(decision.reason(), "device not found in Nautobot");
    }

    #[test]
    fn test_stop_default_reason() {
        let mut intent = IntentRecord::not_found("");
        intent.reason = None;
        let decision = DecisionPolicy::default().evaluate(&intent, None);
        assert_eq!(decision.reason(), "device not found");
    }

    #[test]
    fn test_gate_order_maintenance_before_intended_peer() {
        let intent = established().with_maintenance(true).with_intended_peer(false);
        let decision = DecisionPolicy::default().evaluate(&intent, None);
        assert_eq!(decision.outcome(), Outcome::Skip);
        assert_eq!(decision.reason(), "device under maintenance");
    }

    #[test]
    fn test_peer_not_intended() {
        let intent = established().with_intended_peer(false);
        let decision = DecisionPolicy::default().evaluate(&intent, None);
        assert_eq!(decision.reason(), "peer not intended in SoT");
    }

    #[test]
    fn test_unknown_states_never_match_intent() {
        let telemetry = TelemetrySnapshot::default().with_routes(5, 5, 5, 0);
        let decision = DecisionPolicy::default().evaluate(&established(), Some(&telemetry));
        assert_eq!(decision.outcome(), Outcome::Proceed);
        let details = decision.details().unwrap();
        assert_eq!(details.admin_state, -1);
        assert_eq!(details.oper_state, -1);
    }

    #[test]
    fn test_strict_allows_enabled_but_not_up() {
        let telemetry = TelemetrySnapshot::with_states(1.0, 3.0);
        let decision = DecisionPolicy::strict().evaluate(&established(), Some(&telemetry));
        assert_eq!(decision.outcome(), Outcome::Proceed);
        assert!(decision.ok());
    }

    #[test]
    fn test_strict_blocks_unknown_admin() {
        let telemetry = TelemetrySnapshot {
            oper_state: Some(2.0),
            ..Default::default()
        };
        let decision = DecisionPolicy::strict().evaluate(&established(), Some(&telemetry));
        assert_eq!(decision.outcome(), Outcome::Skip);
        assert!(decision.details().is_some());
    }

    #[test]
    fn test_expected_state_in_details_is_normalized() {
        let intent = IntentRecord::intended(Some("ESTABLISHED"));
        let telemetry = TelemetrySnapshot::with_states(1.0, 2.0);
        let decision = DecisionPolicy::default().evaluate(&intent, Some(&telemetry));
        assert_eq!(decision.details().unwrap().expected_state, "established");
    }
}
