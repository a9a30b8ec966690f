//! Configuration loader for dispatchers
//!
//! Reads `DispatcherConfig` from YAML. A missing file or a document without a
//! `dispatcher` section yields the default configuration; anything present is
//! validated before it is returned.

use std::{fs, path::Path};

use tracing::debug;

use super::{ConfigValidator, DispatcherConfig};
use crate::error::{HooksError, Result};

/// Configuration loader for dispatchers
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a specific file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, is not valid
    /// YAML, or fails validation.
    pub fn load_from_path(path: &Path) -> Result<DispatcherConfig> {
        // If file doesn't exist, use defaults (not an error)
        if !path.exists() {
            debug!(path = %path.display(), "No dispatcher configuration file, using defaults");
            return Ok(DispatcherConfig::default());
        }

        let content = fs::read_to_string(path)?;
        let config = Self::parse_yaml(&content)?;

        debug!(
            path = %path.display(),
            name = %config.name,
            "Loaded dispatcher configuration"
        );
        Ok(config)
    }

    /// Parse YAML configuration content
    ///
    /// Expected YAML format:
    /// ```yaml
    /// dispatcher:
    ///   name: build
    ///   catch_panics: false
    ///   slow_hook_threshold_ms: 100
    /// ```
    pub fn parse_yaml(content: &str) -> Result<DispatcherConfig> {
        let value: serde_yaml::Value = serde_yaml::from_str(content)
            .map_err(|e| HooksError::InvalidConfiguration(format!("Invalid YAML: {}", e)))?;

        let config = match value.get("dispatcher") {
            Some(section) if !section.is_null() => {
                serde_yaml::from_value::<DispatcherConfig>(section.clone()).map_err(|e| {
                    HooksError::InvalidConfiguration(format!(
                        "Failed to parse dispatcher section: {}",
                        e
                    ))
                })?
            }
            _ => DispatcherConfig::default(),
        };

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}
