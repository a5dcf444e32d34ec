//! Client configuration management.
//!
//! Handles loading, saving, and accessing client configuration including
//! API endpoints, credentials, timeouts, and logging settings. Configuration
//! is persisted as TOML on disk and is immutable for the lifetime of any
//! client constructed from it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::{PwError, PwResult};

/// Top-level client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Primary JSON API settings.
    #[serde(default)]
    pub api: ClientConfig,

    /// Integrations API settings.
    #[serde(default)]
    pub integration: IntegrationConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Primary JSON API connection configuration.
///
/// Credentials and the endpoint are fixed at client construction; a client
/// never mutates its configuration afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base endpoint URL, e.g. "https://api.pushwoosh.com/json/1.3".
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,

    /// API access token. Optional; some endpoints accept unauthenticated
    /// requests. When present it is injected into every request envelope.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Request timeout in milliseconds.
    #[serde(default = "default_api_timeout")]
    pub api_timeout_ms: u64,
}

/// Integrations API connection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Base endpoint URL, e.g. "https://integrations.pushwoosh.com/api/v1".
    #[serde(default = "default_integration_endpoint")]
    pub api_endpoint: String,

    /// API access token, sent as the `Authorization` header value.
    #[serde(default)]
    pub api_key: String,

    /// Request timeout in milliseconds.
    #[serde(default = "default_api_timeout")]
    pub api_timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses the default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output for the file layer.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_api_endpoint() -> String {
    constants::DEFAULT_API_ENDPOINT.to_string()
}

fn default_integration_endpoint() -> String {
    constants::DEFAULT_INTEGRATION_ENDPOINT.to_string()
}

fn default_api_timeout() -> u64 {
    constants::DEFAULT_API_TIMEOUT_MS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ClientConfig::default(),
            integration: IntegrationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            api_key: None,
            api_timeout_ms: default_api_timeout(),
        }
    }
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_integration_endpoint(),
            api_key: String::new(),
            api_timeout_ms: default_api_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl ClientConfig {
    /// Convenience constructor for the common case of endpoint + key.
    pub fn new(api_endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            api_endpoint: sanitize_endpoint(&api_endpoint.into()),
            api_key,
            api_timeout_ms: default_api_timeout(),
        }
    }
}

impl IntegrationConfig {
    /// Convenience constructor. The endpoint defaults to the production
    /// Integrations API when `api_endpoint` is `None`.
    pub fn new(api_key: impl Into<String>, api_endpoint: Option<String>) -> Self {
        Self {
            api_endpoint: sanitize_endpoint(
                api_endpoint
                    .as_deref()
                    .unwrap_or(constants::DEFAULT_INTEGRATION_ENDPOINT),
            ),
            api_key: api_key.into(),
            api_timeout_ms: default_api_timeout(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> PwResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> PwResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    pub fn save_to_file(&self, path: &Path) -> PwResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| PwError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PwResult<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| PwError::Config("no config directory on this platform".into()))?;
        Ok(base.join("pushwoosh").join("config.toml"))
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> PwResult<PathBuf> {
        if self.logging.directory.is_empty() {
            let base = dirs::data_dir()
                .ok_or_else(|| PwError::Config("no data directory on this platform".into()))?;
            Ok(base.join("pushwoosh").join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }
}

/// Normalize an endpoint URL: trim whitespace and strip trailing slashes so
/// that joining with a relative URI yields exactly one separator.
pub fn sanitize_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}
