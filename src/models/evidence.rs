//! Evidence bundle collected for one alert instance
//!
//! Built once from intent, telemetry and logs, then only read. The two views
//! serve different audiences: the summary is safe for audit/UI display, the
//! remediation payload carries everything for a downstream reasoning step.

use super::intent::IntentRecord;
use super::session::SessionKey;
use super::telemetry::TelemetrySnapshot;
use crate::engine::decoder::{decode, DecodedState};
use crate::engine::hint::hint;
use serde::Serialize;

/// Default number of log lines carried in the remediation payload
pub const DEFAULT_PAYLOAD_LOG_LINES: usize = 40;

/// Immutable aggregate of everything known about one BGP session alert
#[derive(Debug, Clone, PartialEq)]
pub struct Evidence {
    key: SessionKey,
    telemetry: TelemetrySnapshot,
    log_lines: Vec<String>,
    intent: IntentRecord,
    decoded: DecodedState,
}

/// Reduced intent projection exposed by the summary view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntentProjection {
    pub found: bool,
    pub maintenance: bool,
    pub intended_peer: bool,
    pub expected_state: Option<String>,
    pub site: Option<String>,
    pub role: Option<String>,
}

/// Operator-facing summary (audit / UI)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidenceSummary {
    pub device: String,
    pub peer_address: String,
    pub afi_safi: String,
    pub instance_name: String,
    pub bgp_metrics_hint: String,
    pub metrics: TelemetrySnapshot,
    pub log_lines: usize,
    pub sot: IntentProjection,
    pub decoded: DecodedState,
}

/// Payload for a downstream reasoning collaborator; no redaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemediationPayload<'a> {
    pub metrics: &'a TelemetrySnapshot,
    pub logs: &'a [String],
    pub sot: &'a IntentRecord,
}

impl Evidence {
    /// Assemble evidence, decoding the telemetry state codes once
    pub fn new(
        key: SessionKey,
        intent: IntentRecord,
        telemetry: TelemetrySnapshot,
        log_lines: Vec<String>,
    ) -> Self {
        let decoded = decode(&telemetry);
        Self {
            key,
            telemetry,
            log_lines,
            intent,
            decoded,
        }
    }

    pub fn key(&self) -> &SessionKey {
        &self.key
    }

    pub fn device(&self) -> &str {
        &self.key.device
    }

    pub fn peer_address(&self) -> &str {
        &self.key.peer_address
    }

    pub fn afi_safi(&self) -> &str {
        &self.key.afi_safi
    }

    pub fn instance_name(&self) -> &str {
        &self.key.instance_name
    }

    pub fn telemetry(&self) -> &TelemetrySnapshot {
        &self.telemetry
    }

    pub fn log_lines(&self) -> &[String] {
        &self.log_lines
    }

    pub fn intent(&self) -> &IntentRecord {
        &self.intent
    }

    pub fn decoded(&self) -> &DecodedState {
        &self.decoded
    }

    /// Hint sentence for the collected telemetry
    pub fn hint(&self) -> String {
        hint(&self.telemetry, Some(&self.decoded))
    }

    pub fn summary(&self) -> EvidenceSummary {
        EvidenceSummary {
            device: self.key.device.clone(),
            peer_address: self.key.peer_address.clone(),
            afi_safi: self.key.afi_safi.clone(),
            instance_name: self.key.instance_name.clone(),
            bgp_metrics_hint: self.hint(),
            metrics: self.telemetry.clone(),
            log_lines: self.log_lines.len(),
            sot: IntentProjection {
                found: self.intent.found,
                maintenance: self.intent.maintenance,
                intended_peer: self.intent.intended_peer,
                expected_state: self.intent.expected_state.clone(),
                site: self.intent.site.clone(),
                role: self.intent.role.clone(),
            },
            decoded: self.decoded.clone(),
        }
    }

    /// Full evidence with logs truncated to the first `max_log_lines`
    pub fn remediation_payload(&self, max_log_lines: usize) -> RemediationPayload<'_> {
        let end = max_log_lines.min(self.log_lines.len());
        RemediationPayload {
            metrics: &self.telemetry,
            logs: &self.log_lines[..end],
            sot: &self.intent,
        }
    }
}
