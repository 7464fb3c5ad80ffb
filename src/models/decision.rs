use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Gating outcome of a policy evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Anomaly is actionable; remediation may run
    Proceed,
    /// Anomaly is expected; nothing to do
    Skip,
    /// Evaluation cannot be trusted further (device unknown)
    Stop,
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Proceed => "proceed",
            Outcome::Skip => "skip",
            Outcome::Stop => "stop",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Outcome::Proceed => "🚨",
            Outcome::Skip => "✅",
            Outcome::Stop => "🛑",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw metric values behind a metrics-informed decision, kept for audit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionDetails {
    pub admin_state: i64,
    pub oper_state: i64,
    pub expected_state: String,
}

impl DecisionDetails {
    /// Flat key/value view for annotations and log lines
    pub fn to_fields(&self) -> BTreeMap<&'static str, String> {
        let mut fields = BTreeMap::new();
        fields.insert("admin_state", self.admin_state.to_string());
        fields.insert("oper_state", self.oper_state.to_string());
        fields.insert("expected_state", self.expected_state.clone());
        fields
    }
}

/// Result of a policy evaluation
///
/// `ok` is derived from the outcome and is true only for [`Outcome::Proceed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    ok: bool,
    outcome: Outcome,
    reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<DecisionDetails>,
}

impl Decision {
    fn new(outcome: Outcome, reason: impl Into<String>) -> Self {
        Self {
            ok: outcome == Outcome::Proceed,
            outcome,
            reason: reason.into(),
            details: None,
        }
    }

    pub fn proceed(reason: impl Into<String>) -> Self {
        Self::new(Outcome::Proceed, reason)
    }

    pub fn skip(reason: impl Into<String>) -> Self {
        Self::new(Outcome::Skip, reason)
    }

    pub fn stop(reason: impl Into<String>) -> Self {
        Self::new(Outcome::Stop, reason)
    }

    /// Attach the metric values the decision was based on
    pub fn with_details(mut self, details: DecisionDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn ok(&self) -> bool {
        self.ok
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn details(&self) -> Option<&DecisionDetails> {
        self.details.as_ref()
    }

    /// Stop or Skip end the workflow before remediation
    pub fn is_terminal(&self) -> bool {
        matches!(self.outcome, Outcome::Stop | Outcome::Skip)
    }
}
