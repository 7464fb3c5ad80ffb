use super::{load_document, print_decision, print_json};
use crate::engine::{self, decode, DecodedState};
use crate::models::{Decision, IntentRecord, TelemetrySnapshot};
use crate::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

/// Offline evaluation result
#[derive(Debug, Serialize)]
pub struct EvaluationOutput {
    pub decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decoded: Option<DecodedState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Evaluate intent (and optionally telemetry) read from files
pub fn evaluate_files(intent: &Path, telemetry: Option<&Path>, strict: bool) -> Result<EvaluationOutput> {
    let intent: IntentRecord = load_document(intent)?;
    let telemetry = telemetry
        .map(load_document::<TelemetrySnapshot>)
        .transpose()?;

    let decision = engine::evaluate(&intent, telemetry.as_ref(), strict);
    let decoded = telemetry.as_ref().map(decode);
    let hint = telemetry
        .as_ref()
        .map(|t| engine::hint(t, decoded.as_ref()));

    Ok(EvaluationOutput {
        decision,
        decoded,
        hint,
    })
}

pub fn run(intent: &Path, telemetry: Option<&Path>, strict: bool, json: bool) -> Result<()> {
    let output = evaluate_files(intent, telemetry, strict)?;

    if json {
        return print_json(&output);
    }

    let mode = if strict { "strict" } else { "default" };
    println!("{}", format!("🔎 Policy evaluation ({})", mode).cyan().bold());
    println!();
    print_decision(&output.decision);

    if let Some(decoded) = &output.decoded {
        if let Some(admin) = &decoded.admin_state {
            println!("   Admin:     {}", admin);
        }
        if let Some(oper) = &decoded.oper_state {
            println!("   Oper:      {}", oper);
        }
    }

    if let Some(hint) = &output.hint {
        println!("   Hint:      {}", hint.italic());
    } else {
        println!("   {}", "(no telemetry supplied; intent gates only)".bright_black());
    }

    Ok(())
}
