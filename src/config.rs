/*!
 * Configuration types for the TuringDB client
 */

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, TuringError};
use crate::transfer::TransferOptions;

/// Default SDK endpoint
pub const DEFAULT_HOST: &str = "https://engines.turingdb.ai/sdk";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL every endpoint is appended to
    #[serde(default = "default_host")]
    pub host: String,

    /// Sent as `Turing-Instance-Id` when set
    #[serde(default)]
    pub instance_id: Option<String>,

    /// Sent as a bearer token when set
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Global request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bound used by reachability probes and warmup
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Skip TLS certificate verification
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,

    /// Log level for diagnostic output
    #[serde(default)]
    pub log_level: LogLevel,

    /// Log file path (None = stdout)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging (shorthand for log_level = debug)
    #[serde(default)]
    pub verbose: bool,

    /// Scratch-space behaviour for transfers
    #[serde(default)]
    pub transfer: TransferOptions,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            instance_id: None,
            auth_token: None,
            timeout_secs: default_timeout_secs(),
            probe_timeout_secs: default_probe_timeout_secs(),
            accept_invalid_certs: true,
            log_level: LogLevel::Info,
            log_file: None,
            verbose: false,
            transfer: TransferOptions::default(),
        }
    }
}

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_probe_timeout_secs() -> u64 {
    5
}

impl ClientConfig {
    /// Config pointing at a specific host, everything else default
    pub fn with_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)
            .map_err(|e| TuringError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| TuringError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check the values a client cannot work without
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(TuringError::Config("host cannot be empty".to_string()));
        }
        let url = url::Url::parse(&self.host)
            .map_err(|e| TuringError::Config(format!("Invalid host '{}': {}", self.host, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(TuringError::Config(format!(
                "host must be an http(s) URL, got '{}'",
                self.host
            )));
        }
        if self.timeout_secs == 0 || self.probe_timeout_secs == 0 {
            return Err(TuringError::Config(
                "timeouts must be at least one second".to_string(),
            ));
        }
        self.transfer.validate()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::CleanupScope;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert!(config.accept_invalid_certs);
        assert!(config.transfer.use_scratch);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            host = "http://localhost:6666"
            log_level = "debug"

            [transfer]
            use_scratch = false
            cleanup_scope = "key"
            "#,
        )
        .unwrap();

        assert_eq!(config.host, "http://localhost:6666");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.timeout_secs, 60);
        assert!(!config.transfer.use_scratch);
        assert_eq!(config.transfer.scratch_prefix, "__scratch__");
        assert_eq!(config.transfer.cleanup_scope, CleanupScope::Key);
    }

    #[test]
    fn test_file_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let mut config = ClientConfig::with_host("http://127.0.0.1:6666");
        config.instance_id = Some("inst-1".to_string());
        config.to_file(file.path()).unwrap();

        let loaded = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(loaded.host, "http://127.0.0.1:6666");
        assert_eq!(loaded.instance_id.as_deref(), Some("inst-1"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = ClientConfig::with_host("");
        assert!(matches!(config.validate(), Err(TuringError::Config(_))));

        config.host = "engines.turingdb.ai".to_string();
        assert!(config.validate().is_err());

        config.host = "http://x".to_string();
        config.probe_timeout_secs = 0;
        assert!(config.validate().is_err());

        config.probe_timeout_secs = 5;
        assert!(config.validate().is_ok());
        config.transfer.scratch_prefix = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
