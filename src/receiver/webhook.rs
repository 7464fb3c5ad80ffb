//! Alertmanager webhook payload and label normalisation

use crate::models::session::{DEFAULT_AFI_SAFI, DEFAULT_INSTANCE_NAME};
use crate::models::SessionKey;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Status of an alert (or group) that should be quarantined
pub const FIRING: &str = "firing";

/// One webhook notification (an alert group)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertGroup {
    pub status: String,
    pub receiver: String,
    pub group_labels: BTreeMap<String, String>,
    pub common_labels: BTreeMap<String, String>,
    pub alerts: Vec<Alert>,
}

impl AlertGroup {
    pub fn alertname(&self) -> Option<&str> {
        self.group_labels
            .get("alertname")
            .or_else(|| self.common_labels.get("alertname"))
            .map(String::as_str)
    }
}

/// One alert within a group
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Alert {
    pub status: String,
    pub labels: BTreeMap<String, String>,
    pub annotations: BTreeMap<String, String>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub fingerprint: Option<String>,
}

impl Alert {
    /// Alert status, falling back to the group's when the alert carries none
    pub fn effective_status<'a>(&'a self, group: &'a AlertGroup) -> &'a str {
        if self.status.is_empty() {
            &group.status
        } else {
            &self.status
        }
    }

    pub fn is_firing(&self, group: &AlertGroup) -> bool {
        self.effective_status(group) == FIRING
    }
}

fn first_label<'a>(labels: &'a BTreeMap<String, String>, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .filter_map(|name| labels.get(*name))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
}

/// Session identity from alert labels; `None` without a device and a peer
///
/// Exporters disagree on label names: `hostname` for `device`, `peer` or
/// `neighbor` for `peer_address`, `afi_safi` for `afi_safi_name`,
/// `instance_name` for `name`.
pub fn extract_session_fields(labels: &BTreeMap<String, String>) -> Option<SessionKey> {
    let device = first_label(labels, &["device", "hostname"])?;
    let peer = first_label(labels, &["peer_address", "peer", "neighbor"])?;
    let afi_safi = first_label(labels, &["afi_safi_name", "afi_safi"]).unwrap_or(DEFAULT_AFI_SAFI);
    let instance = first_label(labels, &["name", "instance_name"]).unwrap_or(DEFAULT_INSTANCE_NAME);

    Some(
        SessionKey::new(device, peer)
            .with_afi_safi(afi_safi)
            .with_instance(instance),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_extract_canonical_labels() {
        let key = extract_session_fields(&labels(&[
            ("device", "r1"),
            ("peer_address", "10.0.0.2"),
            ("afi_safi_name", "ipv6-unicast"),
            ("name", "vrf-a"),
        ]))
        .unwrap();

        assert_eq!(key.device, "r1");
        assert_eq!(key.peer_address, "10.0.0.2");
        assert_eq!(key.afi_safi, "ipv6-unicast");
        assert_eq!(key.instance_name, "vrf-a");
    }

    #[test]
    fn test_extract_alias_labels_and_defaults() {
        let key = extract_session_fields(&labels(&[("hostname", "r2"), ("neighbor", "10.0.0.6")])).unwrap();

        assert_eq!(key.device, "r2");
        assert_eq!(key.peer_address, "10.0.0.6");
        assert_eq!(key.afi_safi, "ipv4-unicast");
        assert_eq!(key.instance_name, "default");
    }

    #[test]
    fn test_empty_label_counts_as_missing() {
        let key = extract_session_fields(&labels(&[
            ("device", ""),
            ("hostname", "r3"),
            ("peer", "10.0.0.9"),
        ]))
        .unwrap();
        assert_eq!(key.device, "r3");

        assert!(extract_session_fields(&labels(&[("device", "r1"), ("peer_address", "  ")])).is_none());
        assert!(extract_session_fields(&labels(&[("peer_address", "10.0.0.2")])).is_none());
    }

    #[test]
    fn test_group_deserialization() {
        let group: AlertGroup = serde_json::from_str(
            r#"{
                "status": "firing",
                "groupLabels": {"alertname": "BgpSessionNotUp"},
                "alerts": [{
                    "labels": {"device": "r1", "peer_address": "10.0.0.2"},
                    "startsAt": "2024-05-01T12:00:00Z"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(group.alertname(), Some("BgpSessionNotUp"));
        assert_eq!(group.alerts.len(), 1);
        assert!(group.alerts[0].is_firing(&group));
        assert_eq!(group.alerts[0].starts_at.as_deref(), Some("2024-05-01T12:00:00Z"));
    }
}
