//! Configuration management
//!
//! Handles loading and validating client configuration from TOML files,
//! with environment overrides for the credentials and session path.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::diagnostics::ConfigPresence;

/// Environment variable overriding `credentials.api_id`
pub const ENV_API_ID: &str = "CHATLINK_API_ID";
/// Environment variable overriding `credentials.api_hash`
pub const ENV_API_HASH: &str = "CHATLINK_API_HASH";
/// Environment variable overriding `session.path`
pub const ENV_SESSION_PATH: &str = "CHATLINK_SESSION_PATH";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Session storage configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Path of the session file produced by the setup flow
    #[serde(default)]
    pub path: PathBuf,
}

/// Platform API credentials.
///
/// Both values are optional at load time so that a missing one can be
/// reported in diagnostics instead of failing the whole config.
#[derive(Clone, Default, Deserialize)]
pub struct CredentialsConfig {
    /// Application identifier
    pub api_id: Option<i32>,
    /// Application secret
    pub api_hash: Option<String>,
}

impl CredentialsConfig {
    pub fn api_id_set(&self) -> bool {
        self.api_id.is_some()
    }

    pub fn api_hash_set(&self) -> bool {
        self.api_hash.as_deref().is_some_and(|h| !h.is_empty())
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("api_id", &self.api_id)
            .field("api_hash", &self.api_hash.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from a TOML file, then apply environment overrides
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::parse_with(&contents, |key| std::env::var(key).ok())
            .with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Parse configuration from TOML text without touching the environment
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Self::parse_with(contents, |_| None)
    }

    /// Parse TOML text, apply overrides from `lookup`, then validate.
    ///
    /// Validation runs last so an override may supply a value the file omits.
    pub fn parse_with<F>(contents: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config =
            toml::from_str(contents).with_context(|| "Failed to parse config")?;

        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Override values from a key lookup (normally the process environment)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_API_ID) {
            let api_id = raw
                .trim()
                .parse::<i32>()
                .with_context(|| format!("{} is not a valid integer", ENV_API_ID))?;
            self.credentials.api_id = Some(api_id);
        }
        if let Some(hash) = lookup(ENV_API_HASH) {
            self.credentials.api_hash = Some(hash);
        }
        if let Some(path) = lookup(ENV_SESSION_PATH) {
            self.session.path = PathBuf::from(path);
        }
        Ok(())
    }

    /// Which configuration values are present, for failure diagnostics
    pub fn presence(&self) -> ConfigPresence {
        ConfigPresence {
            session_path: self.session.path.display().to_string(),
            session_file_present: self.session.path.exists(),
            api_id_set: self.credentials.api_id_set(),
            api_hash_set: self.credentials.api_hash_set(),
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.session.path.as_os_str().is_empty() {
            anyhow::bail!("session.path must not be empty");
        }
        if let Some(api_id) = self.credentials.api_id {
            if api_id <= 0 {
                anyhow::bail!("credentials.api_id must be > 0");
            }
        }
        Ok(())
    }
}
