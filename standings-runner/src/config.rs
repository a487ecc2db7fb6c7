//! Serializable dashboard configuration (TOML).
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! [source]
//! endpoint = "https://arena.example.com/api/performance"
//! days = 7
//! limit = 1000
//! timeout_secs = 30
//!
//! [refresh]
//! interval_secs = 60
//!
//! [engine]
//! parallel = true
//! memoize = true
//!
//! [ranking]
//! metric = "sharpe_ratio"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::batch::EngineOptions;
use crate::ranking::RankingMetric;
use crate::source::QueryWindow;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration for a dashboard refresh loop.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub refresh: RefreshConfig,
    pub engine: EngineOptions,
    pub ranking: RankingConfig,
}

/// Where performance history comes from and how much of it to request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Performance-history endpoint. Required only for `watch`.
    pub endpoint: Option<String>,
    /// Query window in days.
    pub days: u32,
    /// Maximum points per entity.
    pub limit: u32,
    /// HTTP client timeout.
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            days: 7,
            limit: 1000,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_secs: 60 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub metric: RankingMetric,
}

impl DashboardConfig {
    /// Parse and validate a TOML string.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.days == 0 {
            return Err(ConfigError::Invalid("source.days must be > 0".into()));
        }
        if self.source.limit == 0 {
            return Err(ConfigError::Invalid("source.limit must be > 0".into()));
        }
        if self.source.timeout_secs == 0 {
            return Err(ConfigError::Invalid("source.timeout_secs must be > 0".into()));
        }
        if self.refresh.interval_secs == 0 {
            return Err(ConfigError::Invalid("refresh.interval_secs must be > 0".into()));
        }
        if let Some(endpoint) = &self.source.endpoint {
            if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
                return Err(ConfigError::Invalid(format!(
                    "source.endpoint must be an http(s) URL, got '{endpoint}'"
                )));
            }
        }
        Ok(())
    }

    pub fn window(&self) -> QueryWindow {
        QueryWindow {
            days: self.source.days,
            limit: self.source.limit,
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_secs)
    }
}
