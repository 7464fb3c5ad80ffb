//! Loki client: log lookup and decision annotations

use super::{
    check_status, http_client, trim_trailing_slash, AuditSink, ClientError, ClientResult, Labels,
    LogSource,
};
use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const SERVICE: &str = "loki";

#[derive(Debug, Deserialize)]
struct QueryRangeResponse {
    #[serde(default)]
    data: Option<QueryRangeData>,
}

#[derive(Debug, Deserialize)]
struct QueryRangeData {
    #[serde(default)]
    result: Vec<Stream>,
}

#[derive(Debug, Deserialize)]
struct Stream {
    /// `[["<ns timestamp>", "<line>"], ...]`
    #[serde(default)]
    values: Vec<(String, String)>,
}

/// Starter LogQL for a BGP session: device logs minus license noise,
/// filtered to BGP terms and the peer address
pub fn bgp_logql(device: &str, peer_address: &str) -> String {
    format!(
        r#"{{device="{}"}} != "license" |~ "(bgp|BGP|neighbor|session|route|ipv4-unicast|{})""#,
        device, peer_address
    )
}

fn unix_nanos(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_nanos_opt().unwrap_or_else(|| ts.timestamp() * 1_000_000_000)
}

/// Loki HTTP API client
#[derive(Clone)]
pub struct LokiClient {
    base_url: String,
    http: reqwest::Client,
}

impl LokiClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            base_url: trim_trailing_slash(base_url),
            http: http_client(SERVICE, timeout)?,
        })
    }

    /// Lines matching `query` over the last `minutes`, newest first, at most `limit`
    pub async fn query_range(&self, query: &str, minutes: u32, limit: u32) -> ClientResult<Vec<String>> {
        let end = Utc::now();
        let start = end - ChronoDuration::minutes(i64::from(minutes));

        let params = [
            ("query", query.to_string()),
            ("start", unix_nanos(start).to_string()),
            ("end", unix_nanos(end).to_string()),
            ("limit", limit.to_string()),
            ("direction", "BACKWARD".to_string()),
        ];

        let response = self
            .http
            .get(format!("{}/loki/api/v1/query_range", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|source| ClientError::Http { service: SERVICE, source })?;

        let body: QueryRangeResponse = check_status(SERVICE, response)?
            .json()
            .await
            .map_err(|e| ClientError::Decode {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let lines = body
            .data
            .map(|d| d.result)
            .unwrap_or_default()
            .into_iter()
            .flat_map(|stream| stream.values.into_iter().map(|(_, line)| line))
            .take(limit as usize)
            .collect();

        Ok(lines)
    }

    /// Push one annotation line under the given stream labels
    pub async fn push(&self, labels: &Labels, message: &str) -> ClientResult<()> {
        let ts = unix_nanos(Utc::now()).to_string();
        let payload: Value = json!({
            "streams": [{ "stream": labels, "values": [[ts, message]] }]
        });

        let response = self
            .http
            .post(format!("{}/loki/api/v1/push", self.base_url))
            .json(&payload)
            .send()
            .await
            .map_err(|source| ClientError::Http { service: SERVICE, source })?;

        check_status(SERVICE, response)?;
        Ok(())
    }
}

#[async_trait]
impl LogSource for LokiClient {
    async fn logs(
        &self,
        device: &str,
        peer_address: &str,
        minutes: u32,
        limit: u32,
    ) -> ClientResult<Vec<String>> {
        self.query_range(&bgp_logql(device, peer_address), minutes, limit).await
    }
}

#[async_trait]
impl AuditSink for LokiClient {
    async fn annotate(&self, labels: &Labels, message: &str) -> ClientResult<()> {
        self.push(labels, message).await
    }
}
