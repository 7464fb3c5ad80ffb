//! Decision engine for BGP session alerts
//!
//! Pure, synchronous functions only: no I/O, no shared state.
//!
//! - `decoder` - numeric state codes to symbolic names
//! - `hint` - ordered heuristics explaining an unhealthy session
//! - `policy` - intent-vs-reality gating (proceed / skip / stop)

pub mod decoder;
pub mod hint;
pub mod policy;

pub use decoder::{decode, DecodedState};
pub use hint::{classify, hint, Hint, HintKind};
pub use policy::DecisionPolicy;

use crate::models::{Decision, IntentRecord, TelemetrySnapshot};

/// Evaluate with an explicit strictness flag
pub fn evaluate(intent: &IntentRecord, telemetry: Option<&TelemetrySnapshot>, strict: bool) -> Decision {
    DecisionPolicy::new(strict).evaluate(intent, telemetry)
}
