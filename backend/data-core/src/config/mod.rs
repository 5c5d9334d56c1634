use crate::error::config::ConfigError;
use crate::{DEFAULT_REMOTE_BASE_URL, STORE_DIRECTORY_NAME};

use common::ErrorLocation;

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

const CONFIG_FILE_NAME: &str = "repository.toml";
const CONFIG_VERSION: u32 = 1;
const DATABASE_FILE_NAME: &str = "repository.db";
const MAX_TIMEOUT_SECS: u64 = 600;

pub const BASE_URL_ENV_VAR: &str = "REPOSITORY_REMOTE_BASE_URL";
pub const DATABASE_PATH_ENV_VAR: &str = "REPOSITORY_DATABASE_PATH";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Name of the environment variable holding the bearer token.
    pub api_token_env: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            api_token_env: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalConfig {
    /// SQLite file; the platform data directory is used when unset.
    pub database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub local: LocalConfig,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            remote: RemoteConfig::default(),
            local: LocalConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_version() -> u32 {
    CONFIG_VERSION
}
fn default_base_url() -> String {
    DEFAULT_REMOTE_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}

// ============================================
// IMPLEMENTATION
// ============================================

impl RepositoryConfig {
    /// Load config from {config_dir}/repository.toml.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read, parsed or
    /// validated.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {e}");
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: RepositoryConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {e}");
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// [`RepositoryConfig::load`], then `.env` and process environment overrides.
    pub fn load_with_env(config_dir: &Path) -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!("Loaded .env from: {}", path.display());
        }

        let mut config = Self::load(config_dir)?;
        config.apply_overrides(|key| env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from `lookup`; blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(base_url) = non_blank(BASE_URL_ENV_VAR) {
            debug!("{BASE_URL_ENV_VAR} overrides remote.base_url");
            self.remote.base_url = base_url;
        }
        if let Some(database_path) = non_blank(DATABASE_PATH_ENV_VAR) {
            debug!("{DATABASE_PATH_ENV_VAR} overrides local.database_path");
            self.local.database_path = Some(PathBuf::from(database_path));
        }
    }

    /// Configured database file, or `{data_local_dir}/data-core/repository.db`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DirectoryNotFound`] if no path is configured and
    /// the platform has no data directory.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.local.database_path {
            return Ok(path.clone());
        }

        dirs::data_local_dir()
            .map(|dir| dir.join(STORE_DIRECTORY_NAME).join(DATABASE_FILE_NAME))
            .ok_or_else(|| ConfigError::DirectoryNotFound {
                location: ErrorLocation::from(Location::caller()),
                reason: "platform has no local data directory".to_string(),
            })
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version == 0 || self.version > CONFIG_VERSION {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid version: {} (expected 1-{})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        let base_url =
            Url::parse(&self.remote.base_url).map_err(|e| ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid base_url {}: {e}", self.remote.base_url),
            })?;
        if base_url.scheme() != "http" && base_url.scheme() != "https" {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("base_url must be http or https: {}", self.remote.base_url),
            });
        }

        if self.remote.timeout_secs == 0 || self.remote.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "Invalid timeout_secs: {} (must be 1-{MAX_TIMEOUT_SECS})",
                    self.remote.timeout_secs
                ),
            });
        }

        if let Some(var) = &self.remote.api_token_env
            && var.trim().is_empty()
        {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "api_token_env cannot be empty string".to_string(),
            });
        }

        if let Some(path) = &self.local.database_path
            && path.as_os_str().is_empty()
        {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "database_path cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}
