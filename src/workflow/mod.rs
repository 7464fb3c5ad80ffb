//! Triage workflow: the I/O shell around the decision engine

pub mod collect;
pub mod flows;

pub use collect::{collect_evidence, evaluate_two_stage};
pub use flows::{
    base_labels, decision_labels, quarantine_flow, resolved_flow, FlowAction, FlowReport,
    ResolvedReport,
};
