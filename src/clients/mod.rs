//! Backend collaborators
//!
//! The decision engine never talks to a backend. The workflow reaches the
//! outside world only through these traits:
//! - [`IntentSource`] - source-of-truth intent (Nautobot)
//! - [`TelemetrySource`] - BGP metrics (Prometheus)
//! - [`LogSource`] - device logs (Loki)
//! - [`SilenceSink`] - quarantine action (Alertmanager silences)
//! - [`AuditSink`] - decision annotations (Loki push)

pub mod alertmanager;
pub mod loki;
pub mod nautobot;
pub mod prometheus;

pub use alertmanager::{AlertmanagerClient, Matcher};
pub use loki::LokiClient;
pub use nautobot::NautobotClient;
pub use prometheus::PrometheusClient;

use crate::models::{IntentRecord, SessionKey, TelemetrySnapshot, TriageConfig};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

/// Errors returned by backend clients
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("{service} request failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} returned HTTP {status}")]
    Status {
        service: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{service} response could not be decoded: {message}")]
    Decode {
        service: &'static str,
        message: String,
    },

    #[error("Missing API token for {0}")]
    MissingToken(&'static str),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Annotation labels (stream labels in Loki)
pub type Labels = BTreeMap<String, String>;

/// Source-of-truth intent lookup
#[async_trait]
pub trait IntentSource: Send + Sync {
    /// Intent for one session. An unknown device yields `found = false`, not an error.
    async fn intent_record(&self, key: &SessionKey) -> ClientResult<IntentRecord>;
}

/// Telemetry lookup
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Current snapshot. Missing series become unknown states / zero counters.
    async fn snapshot(&self, key: &SessionKey) -> ClientResult<TelemetrySnapshot>;
}

/// Log lookup
#[async_trait]
pub trait LogSource: Send + Sync {
    /// At most `limit` log lines from the last `minutes`
    async fn logs(
        &self,
        device: &str,
        peer_address: &str,
        minutes: u32,
        limit: u32,
    ) -> ClientResult<Vec<String>>;
}

/// Remediation action: suppress repeat notifications
#[async_trait]
pub trait SilenceSink: Send + Sync {
    /// Create a time-bounded suppression and return its id
    async fn create_suppression(&self, device: &str, peer_address: &str, minutes: u32) -> ClientResult<String>;
}

/// Audit trail
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn annotate(&self, labels: &Labels, message: &str) -> ClientResult<()>;
}

/// The set of collaborators a workflow run needs
#[derive(Clone)]
pub struct Backends {
    pub intent: Arc<dyn IntentSource>,
    pub telemetry: Arc<dyn TelemetrySource>,
    pub logs: Arc<dyn LogSource>,
    pub silences: Arc<dyn SilenceSink>,
    pub audit: Arc<dyn AuditSink>,
}

impl Backends {
    /// Wire the HTTP clients from configuration
    pub fn from_config(config: &TriageConfig) -> ClientResult<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let loki = Arc::new(LokiClient::new(&config.endpoints.loki_url, timeout)?);
        let alertmanager = AlertmanagerClient::new(&config.endpoints.alertmanager_url, timeout)?
            .with_author(
                &config.workflow.silence_created_by,
                &config.workflow.silence_comment,
            );

        Ok(Self {
            intent: Arc::new(NautobotClient::new(
                &config.endpoints.nautobot_url,
                config.nautobot.resolve_token(),
                timeout,
            )?),
            telemetry: Arc::new(PrometheusClient::new(&config.endpoints.prometheus_url, timeout)?),
            logs: loki.clone(),
            silences: Arc::new(alertmanager),
            audit: loki,
        })
    }
}

/// Build a reqwest client with the per-request timeout
pub(crate) fn http_client(service: &'static str, timeout: Duration) -> ClientResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|source| ClientError::Http { service, source })
}

pub(crate) fn trim_trailing_slash(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

/// Map a response to an error when its status is not 2xx
pub(crate) fn check_status(service: &'static str, response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Status { service, status })
    }
}
