//! Prometheus instant-query client and BGP telemetry source

use super::{check_status, http_client, trim_trailing_slash, ClientError, ClientResult, TelemetrySource};
use crate::models::{SessionKey, TelemetrySnapshot};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

const SERVICE: &str = "prometheus";

/// One series of an instant-query vector result
#[derive(Debug, Clone, Deserialize)]
pub struct PromSample {
    #[serde(default)]
    pub metric: serde_json::Map<String, Value>,

    /// `[<unix ts>, "<string number>"]`
    #[serde(default)]
    pub value: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: Option<QueryData>,
}

#[derive(Debug, Deserialize)]
struct QueryData {
    #[serde(default)]
    result: Vec<PromSample>,
}

/// Value of the first sample; `None` when the result is empty or unparsable
pub fn first_value(result: &[PromSample]) -> Option<f64> {
    let raw = result.first()?.value.get(1)?;
    let value = match raw {
        Value::String(s) => s.parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

/// PromQL selectors for the six BGP series of one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgpQueries {
    pub admin_state: String,
    pub oper_state: String,
    pub received_routes: String,
    pub sent_routes: String,
    pub suppressed_routes: String,
    pub active_routes: String,
}

impl BgpQueries {
    pub fn for_session(key: &SessionKey) -> Self {
        let labels = format!(
            r#"device="{}",peer_address="{}",afi_safi_name="{}",name="{}""#,
            key.device, key.peer_address, key.afi_safi, key.instance_name
        );
        let selector = |metric: &str| format!("bgp_{}{{{}}}", metric, labels);

        Self {
            admin_state: selector("admin_state"),
            oper_state: selector("oper_state"),
            received_routes: selector("received_routes"),
            sent_routes: selector("sent_routes"),
            suppressed_routes: selector("suppressed_routes"),
            active_routes: selector("active_routes"),
        }
    }
}

/// Prometheus HTTP API client
#[derive(Clone)]
pub struct PrometheusClient {
    base_url: String,
    http: reqwest::Client,
}

impl PrometheusClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            base_url: trim_trailing_slash(base_url),
            http: http_client(SERVICE, timeout)?,
        })
    }

    /// Run an instant query and return the vector result
    pub async fn instant(&self, query: &str) -> ClientResult<Vec<PromSample>> {
        let response = self
            .http
            .get(format!("{}/api/v1/query", self.base_url))
            .query(&[("query", query)])
            .send()
            .await
            .map_err(|source| ClientError::Http { service: SERVICE, source })?;

        let body: QueryResponse = check_status(SERVICE, response)?
            .json()
            .await
            .map_err(|e| ClientError::Decode {
                service: SERVICE,
                message: e.to_string(),
            })?;

        Ok(body.data.map(|d| d.result).unwrap_or_default())
    }

    async fn counter(&self, query: &str) -> ClientResult<u64> {
        let value = first_value(&self.instant(query).await?).unwrap_or(0.0);
        Ok(if value > 0.0 { value.trunc() as u64 } else { 0 })
    }
}

#[async_trait]
impl TelemetrySource for PrometheusClient {
    async fn snapshot(&self, key: &SessionKey) -> ClientResult<TelemetrySnapshot> {
        let queries = BgpQueries::for_session(key);
        tracing::debug!(session = %key, "querying BGP telemetry");

        Ok(TelemetrySnapshot {
            admin_state: first_value(&self.instant(&queries.admin_state).await?),
            oper_state: first_value(&self.instant(&queries.oper_state).await?),
            received_routes: self.counter(&queries.received_routes).await?,
            sent_routes: self.counter(&queries.sent_routes).await?,
            suppressed_routes: self.counter(&queries.suppressed_routes).await?,
            active_routes: self.counter(&queries.active_routes).await?,
        })
    }
}
