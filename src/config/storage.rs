use std::env;
use std::path::PathBuf;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::constants::CONFIG_ENV_PREFIX;
use crate::constants::CONFIG_PATH_ENV;
use crate::constants::DEFAULT_STATE_FILE;
use crate::Error;
use crate::Result;

/// Settings of one file-backed state store
///
/// Sources are merged in the following order (later sources override earlier):
/// 1. Type defaults (lowest priority)
/// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
/// 3. Environment variables with `STABLE_STORE__` prefix (highest priority)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Canonical state file. Fixed for the lifetime of the store.
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// Create the state file's parent directory on open if it is missing
    #[serde(default = "default_create_parent_dir")]
    pub create_parent_dir: bool,

    /// Write indented JSON instead of a single line
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// fsync the parent directory after each rename (Unix only)
    #[serde(default = "default_sync_parent_dir")]
    pub sync_parent_dir: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            create_parent_dir: default_create_parent_dir(),
            pretty: default_pretty(),
            sync_parent_dir: default_sync_parent_dir(),
        }
    }
}

impl StorageConfig {
    /// Default settings pointing at `path`.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Loads configuration from hierarchical sources without validation.
    ///
    /// # Note
    /// Validation is deferred to allow further overrides via
    /// `with_override_config()`. Callers MUST call `validate()` before
    /// opening a store with the result.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("STABLE_STORE__PATH", "/var/lib/raft/hard_state.json");
    /// let cfg = StorageConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        let config: Self = builder.add_source(env_source()).build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional overrides from a configuration file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns validated instance.
    pub fn validate(self) -> Result<Self> {
        if self.path.as_os_str().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "storage path cannot be empty".into(),
            )));
        }

        if self.path.is_dir() {
            return Err(Error::Config(ConfigError::Message(format!(
                "storage path {} is a directory, expected a file",
                self.path.display()
            ))));
        }

        Ok(self)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(CONFIG_ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}

fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_STATE_FILE)
}
fn default_create_parent_dir() -> bool {
    true
}
fn default_pretty() -> bool {
    true
}
fn default_sync_parent_dir() -> bool {
    true
}
