//! Alertmanager silences: the quarantine action

use super::{check_status, http_client, trim_trailing_slash, ClientError, ClientResult, SilenceSink};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "alertmanager";

/// Alert silenced by the quarantine action
pub const QUARANTINE_ALERTNAME: &str = "BgpSessionNotUp";

/// Silence label matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matcher {
    pub name: String,
    pub value: String,
    pub is_regex: bool,
}

impl Matcher {
    /// Exact (non-regex) matcher
    pub fn equal(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            is_regex: false,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SilenceRequest<'a> {
    matchers: &'a [Matcher],
    starts_at: String,
    ends_at: String,
    created_by: &'a str,
    comment: &'a str,
}

#[derive(Debug, Deserialize)]
struct SilenceResponse {
    #[serde(default, rename = "silenceID")]
    silence_id: Option<String>,
}

/// RFC 3339 with seconds precision and a `Z` suffix
pub fn to_rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Matchers for the quarantine silence of one peer
pub fn quarantine_matchers(device: &str, peer_address: &str) -> Vec<Matcher> {
    vec![
        Matcher::equal("alertname", QUARANTINE_ALERTNAME),
        Matcher::equal("device", device),
        Matcher::equal("peer_address", peer_address),
    ]
}

/// Alertmanager v2 API client
#[derive(Clone)]
pub struct AlertmanagerClient {
    base_url: String,
    http: reqwest::Client,
    created_by: String,
    comment: String,
}

impl AlertmanagerClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            base_url: trim_trailing_slash(base_url),
            http: http_client(SERVICE, timeout)?,
            created_by: "bgptriage".to_string(),
            comment: "Quarantine: suppress repeat notifications while investigating.".to_string(),
        })
    }

    /// Author and comment recorded on created silences
    pub fn with_author(mut self, created_by: &str, comment: &str) -> Self {
        self.created_by = created_by.to_string();
        self.comment = comment.to_string();
        self
    }

    /// Create a silence lasting `minutes` from now; returns the silence id
    pub async fn create_silence(&self, matchers: &[Matcher], minutes: u32) -> ClientResult<String> {
        let starts = Utc::now();
        let ends = starts + ChronoDuration::minutes(i64::from(minutes));

        let body = SilenceRequest {
            matchers,
            starts_at: to_rfc3339(starts),
            ends_at: to_rfc3339(ends),
            created_by: &self.created_by,
            comment: &self.comment,
        };

        let response = self
            .http
            .post(format!("{}/api/v2/silences", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|source| ClientError::Http { service: SERVICE, source })?;

        let created: SilenceResponse = check_status(SERVICE, response)?
            .json()
            .await
            .map_err(|e| ClientError::Decode {
                service: SERVICE,
                message: e.to_string(),
            })?;

        Ok(created.silence_id.unwrap_or_default())
    }
}

#[async_trait]
impl SilenceSink for AlertmanagerClient {
    async fn create_suppression(&self, device: &str, peer_address: &str, minutes: u32) -> ClientResult<String> {
        self.create_silence(&quarantine_matchers(device, peer_address), minutes)
            .await
    }
}
