//! Client configuration: an optional TOML file, then command-line overrides.
//!
//! ```toml
//! log_level = "debug"
//! log_file = "tax-calc.log"
//!
//! [api]
//! base_url = "http://tax-calculator.internal:8080"
//! tax_year = "2024/2025"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tax_core::ApiConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub api: ApiConfig,
    /// Log filter directive. `None` leaves `RUST_LOG` (or `info`) in effect.
    pub log_level: Option<String>,
    /// Also append log output to this file.
    pub log_file: Option<PathBuf>,
}

/// Values given on the command line; each one present replaces the file's.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub tax_year: Option<String>,
    pub log_level: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl ClientConfig {
    pub fn from_toml_str(
        text: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// File (when given) or defaults, with `overrides` applied on top.
    pub fn resolve(
        path: Option<&Path>,
        overrides: Overrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        Ok(config)
    }

    pub fn apply(
        &mut self,
        overrides: Overrides,
    ) {
        if let Some(base_url) = overrides.base_url {
            self.api.base_url = base_url;
        }
        if let Some(tax_year) = overrides.tax_year {
            self.api.tax_year = tax_year;
        }
        if overrides.log_level.is_some() {
            self.log_level = overrides.log_level;
        }
        if overrides.log_file.is_some() {
            self.log_file = overrides.log_file;
        }
    }
}
