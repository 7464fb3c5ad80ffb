//! Nautobot source-of-truth client
//!
//! BGP intent lives in the device's local config context:
//!
//! ```yaml
//! observability_intent:
//!   bgp:
//!     afi_safi: ipv4-unicast
//!     intended_peers:
//!       - peer_ip: 10.0.0.2
//!         expected_state: established
//! ```

use super::{check_status, http_client, trim_trailing_slash, ClientError, ClientResult, IntentSource};
use crate::models::{IntentRecord, SessionKey};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const SERVICE: &str = "nautobot";

/// Reason reported when the inventory has no such device
pub const DEVICE_NOT_FOUND: &str = "device not found in Nautobot";

#[derive(Debug, Deserialize)]
struct DeviceList {
    #[serde(default)]
    results: Vec<Value>,
}

/// Device maintenance flag from custom fields
pub fn is_device_in_maintenance(device: &Value) -> bool {
    let custom_fields = device
        .get("custom_fields")
        .filter(|v| v.is_object())
        .or_else(|| device.get("_custom_field_data").filter(|v| v.is_object()));

    custom_fields
        .and_then(|cf| cf.get("maintenance"))
        .map(truthy)
        .unwrap_or(false)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Null => false,
    }
}

/// Intended BGP sessions declared for an AFI/SAFI
///
/// Empty when the intent declares a different AFI/SAFI. Non-object entries
/// are dropped.
pub fn intended_bgp_sessions<'a>(device: &'a Value, afi_safi: &str) -> Vec<&'a Value> {
    let Some(bgp) = device
        .get("local_config_context_data")
        .and_then(|ctx| ctx.get("observability_intent"))
        .and_then(|intent| intent.get("bgp"))
    else {
        return Vec::new();
    };

    if let Some(declared) = bgp.get("afi_safi").and_then(Value::as_str) {
        if !declared.is_empty() && declared != afi_safi {
            return Vec::new();
        }
    }

    bgp.get("intended_peers")
        .and_then(Value::as_array)
        .map(|peers| peers.iter().filter(|p| p.is_object()).collect())
        .unwrap_or_default()
}

/// The intended session for one peer, if declared
pub fn intended_bgp_session<'a>(device: &'a Value, afi_safi: &str, peer_address: &str) -> Option<&'a Value> {
    intended_bgp_sessions(device, afi_safi)
        .into_iter()
        .find(|s| s.get("peer_ip").and_then(Value::as_str).unwrap_or("") == peer_address)
}

fn nested_name(device: &Value, field: &str) -> Option<String> {
    device
        .get(field)
        .and_then(|v| v.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Build the intent record for one session from a device object
pub fn intent_from_device(device: &Value, key: &SessionKey) -> IntentRecord {
    let session = intended_bgp_session(device, &key.afi_safi, &key.peer_address);
    let expected_state = session
        .and_then(|s| s.get("expected_state"))
        .and_then(Value::as_str)
        .map(str::to_string);

    IntentRecord {
        found: true,
        reason: None,
        maintenance: is_device_in_maintenance(device),
        intended_peer: session.is_some(),
        expected_state,
        session: session.cloned(),
        device: Some(
            device
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(&key.device)
                .to_string(),
        ),
        site: nested_name(device, "site"),
        role: nested_name(device, "device_role").or_else(|| nested_name(device, "role")),
    }
}

/// Nautobot REST API client
#[derive(Clone)]
pub struct NautobotClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

impl NautobotClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            base_url: trim_trailing_slash(base_url),
            token,
            http: http_client(SERVICE, timeout)?,
        })
    }

    /// First device with the given name, if any
    pub async fn get_device(&self, name: &str) -> ClientResult<Option<Value>> {
        let token = self
            .token
            .as_deref()
            .ok_or(ClientError::MissingToken(SERVICE))?;

        let response = self
            .http
            .get(format!("{}/api/dcim/devices/", self.base_url))
            .header(AUTHORIZATION, format!("Token {}", token))
            .header(ACCEPT, "application/json")
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|source| ClientError::Http { service: SERVICE, source })?;

        let list: DeviceList = check_status(SERVICE, response)?
            .json()
            .await
            .map_err(|e| ClientError::Decode {
                service: SERVICE,
                message: e.to_string(),
            })?;

        Ok(list.results.into_iter().next())
    }
}

#[async_trait]
impl IntentSource for NautobotClient {
    async fn intent_record(&self, key: &SessionKey) -> ClientResult<IntentRecord> {
        match self.get_device(&key.device).await? {
            Some(device) => Ok(intent_from_device(&device, key)),
            None => {
                tracing::warn!(device = %key.device, "device not found in source of truth");
                Ok(IntentRecord::not_found(DEVICE_NOT_FOUND))
            }
        }
    }
}
