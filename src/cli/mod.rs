//! CLI subcommands

pub mod evaluate;
pub mod hint;
pub mod init;
pub mod serve;
pub mod triage;

use crate::models::Decision;
use crate::{Context, Result};
use colored::Colorize;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Read a JSON or YAML document; `.yaml`/`.yml` selects YAML, anything else JSON
pub fn load_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false);

    if is_yaml {
        serde_yaml::from_str(&content).with_context(|| format!("Invalid YAML in {}", path.display()))
    } else {
        serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
    }
}

/// Pretty JSON to stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Colored decision block
pub fn print_decision(decision: &Decision) {
    let outcome = decision.outcome();
    let label = match outcome {
        crate::models::Outcome::Proceed => outcome.name().to_uppercase().red().bold(),
        crate::models::Outcome::Skip => outcome.name().to_uppercase().green().bold(),
        crate::models::Outcome::Stop => outcome.name().to_uppercase().yellow().bold(),
    };

    println!("   Decision:  {} {}", outcome.emoji(), label);
    println!("   Reason:    {}", decision.reason());

    if let Some(details) = decision.details() {
        for (field, value) in details.to_fields() {
            println!("   {:<10} {}", format!("{}:", field), value.bright_black());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IntentRecord;
    use tempfile::TempDir;

    #[test]
    fn test_load_document_by_extension() {
        let temp = TempDir::new().unwrap();

        let json_path = temp.path().join("intent.json");
        std::fs::write(&json_path, r#"{"found": true, "intended_peer": true}"#).unwrap();
        let intent: IntentRecord = load_document(&json_path).unwrap();
        assert!(intent.intended_peer);

        let yaml_path = temp.path().join("intent.yml");
        std::fs::write(&yaml_path, "maintenance: true\n").unwrap();
        let intent: IntentRecord = load_document(&yaml_path).unwrap();
        assert!(intent.found);
        assert!(intent.maintenance);
    }

    #[test]
    fn test_load_document_errors() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("missing.json");
        assert!(load_document::<IntentRecord>(&missing).is_err());

        let bad = temp.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        let err = load_document::<IntentRecord>(&bad).unwrap_err();
        assert!(err.to_string().contains("Invalid JSON"));
    }
}
