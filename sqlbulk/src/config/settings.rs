//! Configuration settings for sqlbulk

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::defaults;
use crate::error::{Error, Result};

/// Placeholder budgets used to size batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkConfig {
    /// Bound-parameter budget for every dialect except the low-limit one
    #[serde(default = "default_max_placeholders")]
    pub max_placeholders: usize,

    /// Bound-parameter budget for the low-limit dialect
    #[serde(default = "default_sqlite_placeholders")]
    pub sqlite_placeholders: usize,

    /// Dialect name prefix that selects `sqlite_placeholders`
    #[serde(default = "default_low_limit_dialect")]
    pub low_limit_dialect: String,
}

// Default value functions for serde
fn default_max_placeholders() -> usize {
    defaults::MAXIMUM_PLACEHOLDERS
}
fn default_sqlite_placeholders() -> usize {
    defaults::SQLITE_PLACEHOLDERS
}
fn default_low_limit_dialect() -> String {
    defaults::LOW_LIMIT_DIALECT.to_string()
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            max_placeholders: default_max_placeholders(),
            sqlite_placeholders: default_sqlite_placeholders(),
            low_limit_dialect: default_low_limit_dialect(),
        }
    }
}

impl BulkConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config: BulkConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "Failed to parse config file {}: {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration using config-rs (file + environment variables)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        } else {
            builder = builder.add_source(File::with_name(defaults::CONFIG_FILE).required(false));
        }

        // SQLBULK_MAX_PLACEHOLDERS etc. Fields contain `_`, so the nesting
        // separator must differ from it.
        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: BulkConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_placeholders == 0 {
            return Err(Error::Config("max_placeholders must be positive".into()));
        }
        if self.sqlite_placeholders == 0 {
            return Err(Error::Config("sqlite_placeholders must be positive".into()));
        }
        if self.low_limit_dialect.is_empty() {
            return Err(Error::Config("low_limit_dialect must not be empty".into()));
        }
        Ok(())
    }

    /// The bound-parameter budget for a dialect name as reported by the executor.
    pub fn placeholder_budget(&self, dialect: &str) -> usize {
        if dialect.starts_with(&self.low_limit_dialect) {
            self.sqlite_placeholders
        } else {
            self.max_placeholders
        }
    }
}
