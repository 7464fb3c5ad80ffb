//! Heuristic explanation of why a BGP session looks unhealthy
//!
//! Rules are evaluated top to bottom and the first match wins. Administrative
//! intent dominates operational state, which dominates route counters.

use super::decoder::DecodedState;
use crate::models::telemetry::{TelemetrySnapshot, UNKNOWN_STATE};
use serde::{Deserialize, Serialize};

/// Which hint rule fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    InsufficientMetrics,
    AdminDisabled,
    OperNotUp,
    NoRoutes,
    RoutesSuppressed,
    ReceivedNoneActive,
    Healthy,
    Inconclusive,
}

/// Inputs shared by every rule
struct HintInput<'a> {
    admin: i64,
    oper: i64,
    snapshot: &'a TelemetrySnapshot,
    decoded: Option<&'a DecodedState>,
}

struct HintRule {
    kind: HintKind,
    applies: fn(&HintInput<'_>) -> bool,
}

fn states_unknown(i: &HintInput<'_>) -> bool {
    i.admin == UNKNOWN_STATE || i.oper == UNKNOWN_STATE
}

fn admin_disabled(i: &HintInput<'_>) -> bool {
    i.admin == 2
}

fn oper_not_up(i: &HintInput<'_>) -> bool {
    i.oper != 1
}

fn no_routes(i: &HintInput<'_>) -> bool {
    i.snapshot.received_routes == 0 && i.snapshot.sent_routes == 0 && i.snapshot.active_routes == 0
}

fn routes_suppressed(i: &HintInput<'_>) -> bool {
    i.snapshot.suppressed_routes > 0
}

fn received_none_active(i: &HintInput<'_>) -> bool {
    i.snapshot.received_routes > 0 && i.snapshot.active_routes == 0
}

fn has_active_routes(i: &HintInput<'_>) -> bool {
    i.snapshot.active_routes > 0
}

/// Ordered rule list. Rules past `OperNotUp` may assume oper is up.
const RULES: &[HintRule] = &[
    HintRule { kind: HintKind::InsufficientMetrics, applies: states_unknown },
    HintRule { kind: HintKind::AdminDisabled, applies: admin_disabled },
    HintRule { kind: HintKind::OperNotUp, applies: oper_not_up },
    HintRule { kind: HintKind::NoRoutes, applies: no_routes },
    HintRule { kind: HintKind::RoutesSuppressed, applies: routes_suppressed },
    HintRule { kind: HintKind::ReceivedNoneActive, applies: received_none_active },
    HintRule { kind: HintKind::Healthy, applies: has_active_routes },
];

impl HintKind {
    fn message(&self, input: &HintInput<'_>) -> String {
        match self {
            HintKind::InsufficientMetrics => {
                "Insufficient metrics to infer a hint (missing admin_state/oper_state).".to_string()
            }
            HintKind::AdminDisabled => {
                "Admin DISABLED → likely intentionally shut (maintenance / config intent).".to_string()
            }
            HintKind::OperNotUp => {
                let oper_text = input
                    .decoded
                    .and_then(|d| d.oper_state.clone())
                    .unwrap_or_else(|| input.oper.to_string());
                format!(
                    "Oper not UP ({}) → likely session not established (reachability/auth/timers).",
                    oper_text
                )
            }
            HintKind::NoRoutes => {
                "Session UP but no routes → possible policy/filtering/AFI mismatch or peer not advertising."
                    .to_string()
            }
            HintKind::RoutesSuppressed => {
                "Routes are being suppressed → likely policy/validation suppressing candidates.".to_string()
            }
            HintKind::ReceivedNoneActive => {
                "Routes received but none active → import policy/validation rejecting routes.".to_string()
            }
            HintKind::Healthy => {
                "Session UP with active routes → looks healthy; check logs for intermittent flaps.".to_string()
            }
            HintKind::Inconclusive => "Metrics present but inconclusive (need more context).".to_string(),
        }
    }
}

/// A classified hint: the rule that fired and its sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    pub kind: HintKind,
    pub message: String,
}

/// Run the rule list against a snapshot
pub fn classify(snapshot: &TelemetrySnapshot, decoded: Option<&DecodedState>) -> Hint {
    let input = HintInput {
        admin: snapshot.admin_code(),
        oper: snapshot.oper_code(),
        snapshot,
        decoded,
    };

    let kind = RULES
        .iter()
        .find(|rule| (rule.applies)(&input))
        .map(|rule| rule.kind)
        .unwrap_or(HintKind::Inconclusive);

    Hint {
        kind,
        message: kind.message(&input),
    }
}

/// One diagnostic sentence for a snapshot
pub fn hint(snapshot: &TelemetrySnapshot, decoded: Option<&DecodedState>) -> String {
    classify(snapshot, decoded).message
}
