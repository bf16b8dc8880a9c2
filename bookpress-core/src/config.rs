//! Configuration for the press and the vending machine
//!
//! Loaded from a TOML file. Every field has a default, so a partial file (or
//! no file at all) is fine:
//!
//! ```toml
//! [press]
//! source_dir = "books"
//! shelf_capacity = 5
//!
//! [vending]
//! location_factor = 1.5
//! password = "hunter2"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub press: PressConfig,
    pub vending: VendingConfig,
}

impl Config {
    /// Load and validate configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.press.validate()?;
        self.vending.validate()
    }
}

/// Press settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PressConfig {
    /// Directory holding one source text per title
    pub source_dir: PathBuf,

    /// Copies kept on each title's shelf after a restock
    pub shelf_capacity: usize,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("books"),
            shelf_capacity: 5,
        }
    }
}

impl PressConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.shelf_capacity == 0 {
            return Err(ConfigError::Validation(
                "press.shelf_capacity must be at least 1".to_string(),
            ));
        }
        if self.source_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "press.source_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Vending machine settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VendingConfig {
    /// Price multiplier applied to a book's page count
    pub location_factor: f64,

    /// Operator password for restocking and emptying the safe
    pub password: Option<String>,
}

impl Default for VendingConfig {
    fn default() -> Self {
        Self {
            location_factor: 1.0,
            password: None,
        }
    }
}

impl VendingConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.location_factor.is_finite() || self.location_factor <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "vending.location_factor must be a positive number, got {}",
                self.location_factor
            )));
        }
        if matches!(&self.password, Some(p) if p.is_empty()) {
            return Err(ConfigError::Validation(
                "vending.password must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
