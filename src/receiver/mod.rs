//! Alertmanager webhook receiver

pub mod http_server;
pub mod webhook;

pub use http_server::{build_router, process_alert_group, start_server, AlertOutcome, AppState, ReceiverReport};
pub use webhook::{extract_session_fields, Alert, AlertGroup};
