//! Source-of-truth intent record for one device / BGP peer

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Expected state assumed when the SoT declares none
pub const DEFAULT_EXPECTED_STATE: &str = "established";

/// Expected-state values meaning the peer is administratively down
pub const DOWN_EQUIVALENT_STATES: &[&str] = &["down", "disabled"];

/// Intent snapshot for one device, peer and AFI/SAFI
///
/// When `found` is false every other field is meaningless and must not be
/// consulted; only `reason` explains the miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRecord {
    /// Device exists in inventory
    #[serde(default = "default_found")]
    pub found: bool,

    /// Why the device could not be found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Device is under declared maintenance
    #[serde(default)]
    pub maintenance: bool,

    /// Peer + AFI/SAFI is declared in intent
    #[serde(default, alias = "intendedPeer")]
    pub intended_peer: bool,

    /// Declared expectation, e.g. "established" or "down"
    #[serde(default, alias = "expectedState")]
    pub expected_state: Option<String>,

    /// Raw intent session record, passed through for evidence
    #[serde(default)]
    pub session: Option<Value>,

    #[serde(default)]
    pub device: Option<String>,

    #[serde(default)]
    pub site: Option<String>,

    #[serde(default)]
    pub role: Option<String>,
}

fn default_found() -> bool {
    true
}

impl IntentRecord {
    /// Record for a device the inventory does not know
    pub fn not_found(reason: impl Into<String>) -> Self {
        Self {
            found: false,
            reason: Some(reason.into()),
            maintenance: false,
            intended_peer: false,
            expected_state: None,
            session: None,
            device: None,
            site: None,
            role: None,
        }
    }

    /// Record for a known device whose peer is declared with the given expectation
    pub fn intended(expected_state: Option<&str>) -> Self {
        Self {
            found: true,
            reason: None,
            maintenance: false,
            intended_peer: true,
            expected_state: expected_state.map(str::to_string),
            session: None,
            device: None,
            site: None,
            role: None,
        }
    }

    pub fn with_maintenance(mut self, maintenance: bool) -> Self {
        self.maintenance = maintenance;
        self
    }

    pub fn with_intended_peer(mut self, intended: bool) -> Self {
        self.intended_peer = intended;
        self
    }

    /// Expected state normalised for comparison (trimmed, lowercase, defaulted)
    pub fn normalized_expected_state(&self) -> String {
        self.expected_state
            .as_deref()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_EXPECTED_STATE.to_string())
    }

    /// Whether the SoT expects this peer to be down
    pub fn expects_down(&self) -> bool {
        let expected = self.normalized_expected_state();
        DOWN_EQUIVALENT_STATES.contains(&expected.as_str())
    }
}
