//! Configuration management for Almanac Fetcher
//!
//! Settings load from a TOML file found in standard locations (or given
//! explicitly with `--config`), with zero-config defaults. Command-line
//! flags and environment variables override file values during plan
//! resolution; the file only supplies the lower-precedence layer.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::FetcherConfig;
use crate::constants::http;
use crate::errors::{ConfigError, Result};

/// Application configuration loaded from TOML
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Cache location settings
    pub cache: CacheSection,
    /// Artifact selection settings
    pub artifact: ArtifactSection,
    /// Download settings
    pub fetch: FetchSection,
}

/// Cache location settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CacheSection {
    /// Cache directory (None = platform default)
    pub dir: Option<PathBuf>,
}

/// Artifact selection settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ArtifactSection {
    /// Artifact descriptor (None = built-in default)
    pub descriptor: Option<String>,
    /// Repository URL (None = built-in default)
    pub repository: Option<String>,
}

/// Download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    /// Skip TLS certificate validation
    pub ignore_ssl: bool,
    /// Overall request timeout in seconds
    pub request_timeout_secs: u64,
    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            ignore_ssl: false,
            request_timeout_secs: http::DEFAULT_TIMEOUT.as_secs(),
            connect_timeout_secs: http::CONNECT_TIMEOUT.as_secs(),
        }
    }
}

impl FetchSection {
    /// Convert to the runtime fetcher configuration
    pub fn to_fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            ..FetcherConfig::default()
        }
    }
}

impl AppConfig {
    /// Load configuration, preferring an explicit file when given.
    ///
    /// An explicitly specified file must exist; otherwise standard
    /// locations are searched and defaults are used when nothing is found.
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_file_override {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound { path }.into());
                }
                Some(path)
            }
            None => Self::find_config_file(),
        };

        match config_path {
            Some(path) => Self::load_from_file(&path).await,
            None => Ok(Self::default()),
        }
    }

    /// Find a configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut search_paths = vec![PathBuf::from("./almanac-fetcher.toml")];
        if let Some(path) = Self::default_config_path() {
            search_paths.push(path);
        }

        for path in search_paths {
            if path.exists() {
                debug!("found config file: {}", path.display());
                return Some(path);
            }
        }

        debug!("no config file found in standard locations");
        None
    }

    /// Default per-user config file path
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("almanac-fetcher").join("config.toml"))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| ConfigError::Io {
                    path: path.clone(),
                    source,
                })?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::InvalidFormat)?;

        info!("loaded configuration from: {}", path.display());
        Ok(config)
    }
}
