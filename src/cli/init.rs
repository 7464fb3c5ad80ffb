use crate::models::config::CONFIG_FILE_NAME;
use crate::models::TriageConfig;
use crate::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Write the default configuration; returns the path written, or `None` if skipped
pub fn write_default_config(path: &Path, force: bool) -> Result<Option<PathBuf>> {
    if path.exists() && !force {
        return Ok(None);
    }

    TriageConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(Some(path.to_path_buf()))
}

pub fn run(path: Option<&Path>, force: bool) -> Result<()> {
    let path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    match write_default_config(&path, force)? {
        Some(written) => {
            println!("{}", "✅ Configuration written".green().bold());
            println!("   Location: {}", written.display());
            println!();
            println!("{}", "Next steps:".cyan());
            println!("   1. Point [endpoints] at your Nautobot, Prometheus, Alertmanager and Loki");
            println!("   2. export NAUTOBOT_TOKEN=<token>");
            println!("   3. {}", "bgptriage serve".green());
        }
        None => {
            println!(
                "{}",
                format!("⚠️  {} already exists", path.display()).yellow()
            );
            println!("   Run with --force to overwrite");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_default_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bgptriage.toml");

        let written = write_default_config(&path, false).unwrap();
        assert_eq!(written.as_deref(), Some(path.as_path()));

        let loaded = TriageConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded, TriageConfig::default());
    }

    #[test]
    fn test_refuses_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bgptriage.toml");
        std::fs::write(&path, "timeout_secs = 3\n").unwrap();

        assert!(write_default_config(&path, false).unwrap().is_none());
        assert_eq!(TriageConfig::load(Some(&path)).unwrap().timeout_secs, 3);

        assert!(write_default_config(&path, true).unwrap().is_some());
        assert_eq!(TriageConfig::load(Some(&path)).unwrap().timeout_secs, 10);
    }
}
