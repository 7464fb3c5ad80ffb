//! Triage configuration (`bgptriage.toml`)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "bgptriage.toml";

/// Errors raised while loading or saving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file '{0}': {1}")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}': {1}")]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to write config file '{0}': {1}")]
    Write(PathBuf, #[source] std::io::Error),
}

/// Backend base URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub nautobot_url: String,
    pub prometheus_url: String,
    pub alertmanager_url: String,
    pub loki_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            nautobot_url: "http://localhost:8080".to_string(),
            prometheus_url: "http://localhost:9090".to_string(),
            alertmanager_url: "http://localhost:9093".to_string(),
            loki_url: "http://localhost:3001".to_string(),
        }
    }
}

/// Nautobot credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NautobotConfig {
    /// Inline API token (takes precedence over `token_env`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Environment variable holding the API token
    pub token_env: String,
}

impl Default for NautobotConfig {
    fn default() -> Self {
        Self {
            token: None,
            token_env: "NAUTOBOT_TOKEN".to_string(),
        }
    }
}

impl NautobotConfig {
    /// Resolve the token from config, then from the environment
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.is_empty())
            .or_else(|| std::env::var(&self.token_env).ok().filter(|t| !t.is_empty()))
    }
}

/// Quarantine workflow settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Workflow name written into annotation labels
    pub name: String,

    /// Annotation `source` label
    pub source: String,

    /// Log lookback window in minutes
    pub log_minutes: u32,

    /// Maximum log lines collected per alert
    pub log_limit: u32,

    /// Silence duration in minutes
    pub quarantine_minutes: u32,

    /// Only quarantine when admin is enabled but oper is not up
    pub strict: bool,

    /// Log lines carried in the remediation payload
    pub max_payload_log_lines: usize,

    pub silence_created_by: String,

    pub silence_comment: String,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            name: "demo_quarantine_bgp".to_string(),
            source: "bgptriage".to_string(),
            log_minutes: 30,
            log_limit: 50,
            quarantine_minutes: 20,
            strict: false,
            max_payload_log_lines: 40,
            silence_created_by: "bgptriage".to_string(),
            silence_comment: "Quarantine: suppress repeat notifications while investigating."
                .to_string(),
        }
    }
}

/// Webhook receiver settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    /// Alert names the receiver acts on; others are ignored
    pub handled_alertnames: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8089,
            handled_alertnames: vec!["BgpSessionNotUp".to_string()],
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriageConfig {
    /// Per-request timeout for backend calls
    pub timeout_secs: u64,

    pub endpoints: Endpoints,

    pub nautobot: NautobotConfig,

    pub workflow: WorkflowConfig,

    pub server: ServerConfig,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            endpoints: Endpoints::default(),
            nautobot: NautobotConfig::default(),
            workflow: WorkflowConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl TriageConfig {
    /// User-level config path (~/.bgptriage/config.toml)
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".bgptriage").join("config.toml"))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `./bgptriage.toml` and then
    /// `~/.bgptriage/config.toml` are tried before falling back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_file(path);
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return Self::load_file(&local);
        }

        match Self::user_config_path() {
            Some(user) if user.exists() => Self::load_file(&user),
            _ => Ok(Self::default()),
        }
    }

    /// Parse a config file
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
    }

    /// Write config as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write(path.to_path_buf(), e))?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::Write(path.to_path_buf(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = TriageConfig::default();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.endpoints.loki_url, "http://localhost:3001");
        assert_eq!(config.workflow.quarantine_minutes, 20);
        assert!(!config.workflow.strict);
        assert_eq!(config.server.handled_alertnames, vec!["BgpSessionNotUp"]);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bgptriage.toml");
        std::fs::write(
            &path,
            "timeout_secs = 3\n[workflow]\nstrict = true\n[endpoints]\nprometheus_url = \"http://prom:9090\"\n",
        )
        .unwrap();

        let config = TriageConfig::load(Some(&path)).unwrap();
        assert_eq!(config.timeout_secs, 3);
        assert!(config.workflow.strict);
        assert_eq!(config.workflow.log_limit, 50);
        assert_eq!(config.endpoints.prometheus_url, "http://prom:9090");
        assert_eq!(config.endpoints.loki_url, "http://localhost:3001");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.toml");
        let result = TriageConfig::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.toml");
        std::fs::write(&path, "timeout_secs = \"ten\"").unwrap();
        let result = TriageConfig::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::Parse(_, _))));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/bgptriage.toml");

        let mut config = TriageConfig::default();
        config.server.port = 9999;
        config.save(&path).unwrap();

        let loaded = TriageConfig::load_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_inline_token_wins() {
        let nautobot = NautobotConfig {
            token: Some("abc".to_string()),
            token_env: "BGPTRIAGE_TEST_UNSET_TOKEN_VAR".to_string(),
        };
        assert_eq!(nautobot.resolve_token().as_deref(), Some("abc"));

        let empty = NautobotConfig {
            token: None,
            token_env: "BGPTRIAGE_TEST_UNSET_TOKEN_VAR".to_string(),
        };
        assert!(empty.resolve_token().is_none());
    }
}
