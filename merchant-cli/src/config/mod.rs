//! Runtime configuration
//!
//! Values are layered, later sources winning:
//! 1. TOML file (`--config PATH`, else `<config dir>/merchant-cli/config.toml` if present)
//! 2. Environment variables (a `.env` file is loaded into the environment by `main`)
//!
//! The API base URL and key are required. There are no built-in defaults for
//! either; loading fails with [`ConfigError::Missing`] instead.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ApiVariant;

pub const ENV_API_URL: &str = "MERCHANT_API_URL";
pub const ENV_API_KEY: &str = "MERCHANT_API_KEY";
pub const ENV_API_VARIANT: &str = "MERCHANT_API_VARIANT";
pub const ENV_API_TIMEOUT_SECS: &str = "MERCHANT_API_TIMEOUT_SECS";
pub const ENV_PREVIEW_ROWS: &str = "MERCHANT_PREVIEW_ROWS";

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting '{key}' (set {var} or add it to the config file)")]
    Missing { var: &'static str, key: &'static str },

    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Connection settings for the merchant API
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub variant: ApiVariant,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            variant: ApiVariant::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    /// Number of normalized rows shown before a bulk upload
    pub preview_rows: usize,
}

/// On-disk shape of the config file; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub api: FileApiConfig,
    pub preview_rows: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileApiConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub variant: Option<ApiVariant>,
    pub timeout_secs: Option<u64>,
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("merchant-cli").join("config.toml"))
    }

    /// Load from the given file (or the default location) and the process environment
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match explicit_path {
            Some(path) => read_file_config(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => read_file_config(&path)?,
                _ => FileConfig::default(),
            },
        };

        Self::from_sources(file, |name| std::env::var(name).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub fn from_sources<F>(file: FileConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let base_url = env(ENV_API_URL)
            .or(file.api.base_url)
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing {
                var: ENV_API_URL,
                key: "api.base_url",
            })?;
        let base_url = base_url.trim().to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: ENV_API_URL,
                value: base_url,
                reason: "must start with http:// or https://".to_string(),
            });
        }

        let api_key = env(ENV_API_KEY)
            .or(file.api.api_key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing {
                var: ENV_API_KEY,
                key: "api.api_key",
            })?;

        let variant = match env(ENV_API_VARIANT) {
            Some(raw) => raw.parse::<ApiVariant>().map_err(|reason| ConfigError::Invalid {
                var: ENV_API_VARIANT,
                value: raw.clone(),
                reason,
            })?,
            None => file.api.variant.unwrap_or_default(),
        };

        let timeout_secs = match env(ENV_API_TIMEOUT_SECS) {
            Some(raw) => parse_positive(ENV_API_TIMEOUT_SECS, &raw)?,
            None => file.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };

        let preview_rows = match env(ENV_PREVIEW_ROWS) {
            Some(raw) => parse_positive(ENV_PREVIEW_ROWS, &raw)? as usize,
            None => file.preview_rows.unwrap_or(DEFAULT_PREVIEW_ROWS),
        };
        if preview_rows == 0 {
            return Err(ConfigError::Invalid {
                var: ENV_PREVIEW_ROWS,
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            api: ApiConfig {
                variant,
                ..ApiConfig::new(base_url, api_key).with_timeout(Duration::from_secs(timeout_secs))
            },
            preview_rows,
        })
    }
}

/// Preview row count without requiring API settings (used by offline commands)
pub fn preview_rows_from_env() -> usize {
    std::env::var(ENV_PREVIEW_ROWS)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_PREVIEW_ROWS)
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("Loaded config file {}", path.display());
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_positive(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            var,
            value: raw.to_string(),
            reason: "expected a positive integer".to_string(),
        }),
    }
}
