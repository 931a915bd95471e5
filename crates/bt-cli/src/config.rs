//! CLI configuration
//!
//! Loaded from TOML. An explicit `--config` path must exist; otherwise
//! `bt.toml` in the working directory is used when present, and built-in
//! defaults when it is not.

use bt_attr::ATTR_CLASS_ENTRY;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "bt.toml";

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    Missing { path: PathBuf },

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value for {field}: {details}")]
    Invalid { field: &'static str, details: String },
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttrConfig {
    /// Archive entry holding the attribute class
    pub entry: String,
}

impl Default for AttrConfig {
    fn default() -> Self {
        Self {
            entry: ATTR_CLASS_ENTRY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// `EnvFilter` directives used when `BT_LOG` is unset
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Effective CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub attr: AttrConfig,
    pub log: LogConfig,
}

impl Config {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] when `None`
    ///
    /// # Errors
    /// Returns error if an explicit path is missing, the file cannot be read
    /// or parsed, or a value fails validation
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path_buf = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);

        let cfg = if path_buf.exists() {
            Self::from_file(&path_buf)?
        } else if path.is_some() {
            return Err(ConfigError::Missing { path: path_buf });
        } else {
            Self::default()
        };

        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check values serde cannot
    ///
    /// # Errors
    /// Returns error naming the first invalid field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attr.entry.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "attr.entry",
                details: "must not be empty".to_string(),
            });
        }
        if let Err(error) = EnvFilter::try_new(&self.log.level) {
            return Err(ConfigError::Invalid {
                field: "log.level",
                details: error.to_string(),
            });
        }
        Ok(())
    }
}
