//! Vantage configuration file handling
//!
//! A page's interactive sections are configured from `vantage.toml`:
//!
//! ```toml
//! [carousel]
//! autoplay_ms = 5000
//! pause_on_hover = true
//!
//! [reveal]
//! marker = "[data-reveal]"
//! threshold = 0.12
//! ```
//!
//! Every key is optional.

use crate::carousel::CarouselOptions;
use crate::error::ConfigError;
use crate::reveal::RevealOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Conventional file name
pub const CONFIG_FILE: &str = "vantage.toml";

/// Configuration for the interactive sections of a page
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VantageConfig {
    #[serde(default)]
    pub carousel: CarouselOptions,
    #[serde(default)]
    pub reveal: RevealOptions,
}

impl VantageConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: VantageConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `vantage.toml` from `dir`, falling back to defaults if absent
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, dir.display());
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Serialize to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write configuration to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reject values that parse but make no sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.reveal.threshold;
        if threshold.is_nan() || !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::Invalid(format!(
                "reveal.threshold must be between 0.0 and 1.0, got {}",
                threshold
            )));
        }
        if self.reveal.marker.trim().is_empty() {
            return Err(ConfigError::Invalid("reveal.marker must not be empty".into()));
        }
        Ok(())
    }
}
