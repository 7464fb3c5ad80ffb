use super::{load_document, print_json};
use crate::engine::{classify, decode, DecodedState, Hint};
use crate::models::TelemetrySnapshot;
use crate::Result;
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct HintOutput {
    metrics: TelemetrySnapshot,
    decoded: DecodedState,
    hint: Hint,
}

/// Decode and classify a telemetry file
pub fn run(telemetry: &Path, json: bool) -> Result<()> {
    let metrics: TelemetrySnapshot = load_document(telemetry)?;
    let decoded = decode(&metrics);
    let hint = classify(&metrics, Some(&decoded));

    if json {
        return print_json(&HintOutput { metrics, decoded, hint });
    }

    println!("{}", "🩺 BGP telemetry".cyan().bold());
    println!();
    println!(
        "   Admin:     {}",
        decoded.admin_state.as_deref().unwrap_or("-")
    );
    println!(
        "   Oper:      {}",
        decoded.oper_state.as_deref().unwrap_or("-")
    );
    println!(
        "   Routes:    rx={} tx={} active={} suppressed={}",
        metrics.received_routes, metrics.sent_routes, metrics.active_routes, metrics.suppressed_routes
    );
    println!();
    println!("   {}", hint.message.yellow());

    Ok(())
}
