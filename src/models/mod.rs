pub mod config;
pub mod decision;
pub mod evidence;
pub mod intent;
pub mod session;
pub mod telemetry;

pub use config::{ConfigError, TriageConfig};
pub use decision::{Decision, DecisionDetails, Outcome};
pub use evidence::{Evidence, EvidenceSummary, IntentProjection, RemediationPayload};
pub use intent::IntentRecord;
pub use session::SessionKey;
pub use telemetry::{parse_state_code, TelemetrySnapshot, UNKNOWN_STATE};
