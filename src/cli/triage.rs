use super::{print_decision, print_json};
use crate::clients::Backends;
use crate::models::{SessionKey, TriageConfig};
use crate::workflow::{quarantine_flow, resolved_flow, FlowAction};
use crate::{Context, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Run the quarantine flow for one session against the configured backends
pub async fn run(config: &TriageConfig, key: SessionKey, strict: bool, json: bool) -> Result<()> {
    let mut settings = config.workflow.clone();
    settings.strict |= strict;

    let backends = Backends::from_config(config).context("Failed to build backend clients")?;

    let pb = (!json).then(|| spinner(format!("Collecting evidence for {}...", key)));
    let result = quarantine_flow(&backends, &settings, &key).await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let report = result?;

    if json {
        return print_json(&report);
    }

    let summary = &report.evidence_summary;
    println!("{}", format!("🧭 Triage: {}", key).cyan().bold());
    println!();
    println!(
        "   Session:   {} / {}",
        summary.afi_safi, summary.instance_name
    );
    if let Some(admin) = &summary.decoded.admin_state {
        println!("   Admin:     {}", admin);
    }
    if let Some(oper) = &summary.decoded.oper_state {
        println!("   Oper:      {}", oper);
    }
    println!("   Hint:      {}", summary.bgp_metrics_hint.italic());
    println!("   Logs:      {} line(s)", summary.log_lines);
    println!();
    print_decision(&report.decision);
    println!();

    match report.action {
        FlowAction::Quarantine => println!(
            "{}",
            format!(
                "🔇 Quarantined for {} min (silence {})",
                settings.quarantine_minutes,
                report.silence_id.as_deref().unwrap_or("-")
            )
            .yellow()
            .bold()
        ),
        FlowAction::None => println!("{}", "✓ No action taken".green()),
    }
    println!("   Run:       {}", report.run_id.to_string().bright_black());

    Ok(())
}

/// Record a resolution for one session
pub async fn resolve(config: &TriageConfig, key: SessionKey) -> Result<()> {
    let backends = Backends::from_config(config).context("Failed to build backend clients")?;
    let report = resolved_flow(&backends, &config.workflow, &key).await?;

    println!("{}", format!("✅ Resolved: {}", key).green().bold());
    println!("   Run:       {}", report.run_id.to_string().bright_black());
    Ok(())
}
