// bgptriage - BGP session alert triage
// Decides whether a BGP session alert is actionable, expected, or untrustworthy

pub mod cli;
pub mod clients;
pub mod engine;
pub mod models;
pub mod receiver;
pub mod workflow;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use engine::{decode, evaluate, hint, DecisionPolicy};
pub use models::{Decision, Evidence, IntentRecord, Outcome, SessionKey, TelemetrySnapshot, TriageConfig};
