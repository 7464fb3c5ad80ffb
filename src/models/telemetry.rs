//! Telemetry snapshot for one BGP session
//!
//! State codes follow the Telegraf enum mapping:
//! - `admin_state`: enable=1, disable=2
//! - `oper_state`:  up=1, down=2, idle=3, connect=4, active=5
//!
//! An absent state code (or the `-1` sentinel) means *unknown*. Route counters
//! default to `0`, which is an observed value and never means "missing".

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Sentinel for a state code that is missing or could not be parsed
pub const UNKNOWN_STATE: i64 = -1;

/// Coerce a raw state code through the float-then-int path.
///
/// Returns `None` for absent, non-finite or out-of-range values, so `1.0`
/// and `1` both yield `Some(1)` and `1.7` truncates to `Some(1)`.
pub fn coerce_state_code(raw: Option<f64>) -> Option<i64> {
    let value = raw?;
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

/// Parse a state code, falling back to [`UNKNOWN_STATE`] on any failure
pub fn parse_state_code(raw: Option<f64>) -> i64 {
    coerce_state_code(raw).unwrap_or(UNKNOWN_STATE)
}

/// Point-in-time BGP telemetry for one session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    /// Raw admin state code (absent = unknown)
    #[serde(
        default,
        alias = "adminState",
        deserialize_with = "lenient_state",
        skip_serializing_if = "Option::is_none"
    )]
    pub admin_state: Option<f64>,

    /// Raw oper state code (absent = unknown)
    #[serde(
        default,
        alias = "operState",
        deserialize_with = "lenient_state",
        skip_serializing_if = "Option::is_none"
    )]
    pub oper_state: Option<f64>,

    #[serde(default, alias = "receivedRoutes", deserialize_with = "lenient_counter")]
    pub received_routes: u64,

    #[serde(default, alias = "sentRoutes", deserialize_with = "lenient_counter")]
    pub sent_routes: u64,

    #[serde(default, alias = "suppressedRoutes", deserialize_with = "lenient_counter")]
    pub suppressed_routes: u64,

    #[serde(default, alias = "activeRoutes", deserialize_with = "lenient_counter")]
    pub active_routes: u64,
}

impl TelemetrySnapshot {
    /// Snapshot with known admin/oper codes and zeroed counters
    pub fn with_states(admin_state: f64, oper_state: f64) -> Self {
        Self {
            admin_state: Some(admin_state),
            oper_state: Some(oper_state),
            ..Self::default()
        }
    }

    /// Set route counters (received, sent, active, suppressed)
    pub fn with_routes(mut self, received: u64, sent: u64, active: u64, suppressed: u64) -> Self {
        self.received_routes = received;
        self.sent_routes = sent;
        self.active_routes = active;
        self.suppressed_routes = suppressed;
        self
    }

    /// Admin state after coercion (`-1` when unknown)
    pub fn admin_code(&self) -> i64 {
        parse_state_code(self.admin_state)
    }

    /// Oper state after coercion (`-1` when unknown)
    pub fn oper_code(&self) -> i64 {
        parse_state_code(self.oper_state)
    }
}

/// Interpret a JSON value as a number, accepting numeric strings
fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn lenient_state<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_as_f64).filter(|v| v.is_finite()))
}

fn lenient_counter<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let count = value
        .as_ref()
        .and_then(value_as_f64)
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.trunc() as u64)
        .unwrap_or(0);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_state_code_float_then_int() {
        assert_eq!(coerce_state_code(Some(1.0)), Some(1));
        assert_eq!(coerce_state_code(Some(1.7)), Some(1));
        assert_eq!(coerce_state_code(Some(-1.0)), Some(-1));
        assert_eq!(coerce_state_code(None), None);
        assert_eq!(coerce_state_code(Some(f64::NAN)), None);
        assert_eq!(coerce_state_code(Some(f64::INFINITY)), None);
        assert_eq!(coerce_state_code(Some(1e30)), None);
    }

    #[test]
    fn test_parse_state_code_fallback() {
        assert_eq!(parse_state_code(Some(2.0)), 2);
        assert_eq!(parse_state_code(None), UNKNOWN_STATE);
        assert_eq!(parse_state_code(Some(f64::NAN)), UNKNOWN_STATE);
    }

    #[test]
    fn test_lenient_deserialization() {
        let snapshot: TelemetrySnapshot = serde_json::from_value(serde_json::json!({
            "admin_state": "1.0",
            "oper_state": "garbage",
            "received_routes": 12.0,
            "sent_routes": "3",
            "suppressed_routes": -4,
            "active_routes": null
        }))
        .unwrap();

        assert_eq!(snapshot.admin_state, Some(1.0));
        assert_eq!(snapshot.oper_state, None);
        assert_eq!(snapshot.received_routes, 12);
        assert_eq!(snapshot.sent_routes, 3);
        assert_eq!(snapshot.suppressed_routes, 0);
        assert_eq!(snapshot.active_routes, 0);
    }

    #[test]
    fn test_camel_case_aliases() {
        let snapshot: TelemetrySnapshot = serde_json::from_str(
            r#"{"adminState": 1, "operState": 4, "receivedRoutes": 0, "activeRoutes": 2}"#,
        )
        .unwrap();

        assert_eq!(snapshot.admin_code(), 1);
        assert_eq!(snapshot.oper_code(), 4);
        assert_eq!(snapshot.active_routes, 2);
    }

    #[test]
    fn test_missing_fields_default() {
        let snapshot: TelemetrySnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot, TelemetrySnapshot::default());
        assert_eq!(snapshot.admin_code(), UNKNOWN_STATE);
        assert_eq!(snapshot.received_routes, 0);
    }
}
