//! Application configuration
//!
//! Defines the webhook target, the monitored domains and the check settings,
//! loaded from a YAML file.

use crate::models::DomainEntry;
use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Configuration file read when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Certificate check settings
#[derive(Debug, Clone, Deserialize)]
pub struct CheckSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_expiry_threshold")]
    pub expiry_threshold_days: i64,
    /// No timeout is applied when unset
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    #[serde(default)]
    pub handshake_timeout_secs: Option<u64>,
    /// Send "Certificate check failed: <detail>" for unclassified errors
    /// instead of an empty message
    #[serde(default)]
    pub describe_other_errors: bool,
    /// Root certificates used to verify servers
    #[serde(default)]
    pub trust_store: TrustStore,
}

/// Source of trusted root certificates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustStore {
    /// Roots installed in the operating system
    #[default]
    System,
    /// Bundled Mozilla roots
    Webpki,
}

fn default_port() -> u16 {
    443
}

fn default_expiry_threshold() -> i64 {
    30
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            expiry_threshold_days: default_expiry_threshold(),
            connect_timeout_secs: None,
            handshake_timeout_secs: None,
            describe_other_errors: false,
            trust_store: TrustStore::default(),
        }
    }
}

impl CheckSettings {
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn handshake_timeout(&self) -> Option<Duration> {
        self.handshake_timeout_secs.map(Duration::from_secs)
    }
}

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub slack_webhook_url: String,
    pub domains: Vec<DomainEntry>,
    #[serde(default)]
    pub check: CheckSettings,
}

impl Settings {
    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => ConfigError::ReadError {
                path: path.display().to_string(),
                source: e,
            },
        })?;

        Self::from_yaml(&content)
    }

    /// Parse and validate settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Replace the webhook URL, e.g. from a command-line override
    pub fn with_webhook_url(mut self, url: impl Into<String>) -> Result<Self, ConfigError> {
        self.slack_webhook_url = url.into();
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        validate_webhook_url(&self.slack_webhook_url)?;

        for (i, domain) in self.domains.iter().enumerate() {
            if domain.url.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: format!("domains[{}].url", i),
                    message: "hostname must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }
}

fn validate_webhook_url(url: &str) -> Result<(), ConfigError> {
    if url.trim().is_empty() {
        return Err(ConfigError::MissingRequired {
            key: "slack_webhook_url".to_string(),
        });
    }

    let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidValue {
        key: "slack_webhook_url".to_string(),
        message: e.to_string(),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::InvalidValue {
            key: "slack_webhook_url".to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}
