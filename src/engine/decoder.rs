//! Decode numeric BGP state codes into symbolic names

use crate::models::telemetry::{coerce_state_code, TelemetrySnapshot};
use serde::{Deserialize, Serialize};

/// admin_state enum table (Telegraf mapping)
const ADMIN_STATES: &[(i64, &str)] = &[(1, "enable"), (2, "disable")];

/// oper_state enum table (Telegraf mapping)
const OPER_STATES: &[(i64, &str)] = &[
    (1, "up"),
    (2, "down"),
    (3, "idle"),
    (4, "connect"),
    (5, "active"),
];

/// Symbolic admin/oper states; a key is omitted when its code is absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oper_state: Option<String>,
}

impl DecodedState {
    pub fn is_empty(&self) -> bool {
        self.admin_state.is_none() && self.oper_state.is_none()
    }
}

fn lookup(table: &[(i64, &str)], code: i64) -> String {
    table
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("unknown({})", code))
}

/// Name for an admin state code, `unknown(v)` when untabled
pub fn admin_state_name(code: i64) -> String {
    lookup(ADMIN_STATES, code)
}

/// Name for an oper state code, `unknown(v)` when untabled
pub fn oper_state_name(code: i64) -> String {
    lookup(OPER_STATES, code)
}

/// Decode the state codes of a snapshot. Never fails.
pub fn decode(snapshot: &TelemetrySnapshot) -> DecodedState {
    DecodedState {
        admin_state: coerce_state_code(snapshot.admin_state).map(admin_state_name),
        oper_state: coerce_state_code(snapshot.oper_state).map(oper_state_name),
    }
}
