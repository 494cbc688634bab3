//! Configuration file loading and parsing

use crate::error::{Error, Result};
use crate::types::ExtensionConfig;
use camino::Utf8Path;
use regex::Regex;
use std::fs;
use tracing::debug;

/// Log levels accepted in the `log-level` key
const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

impl ExtensionConfig {
    /// Load configuration from a YAML file, or defaults when no path is given
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("No configuration file given, using defaults");
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::config_not_found(path.as_str())
            } else {
                Error::Io(e)
            }
        })?;

        debug!("Loaded configuration from {}", path);
        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document deserializes to null rather than an empty mapping
        let config: Self = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml_ng::from_str(content)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(Error::invalid_config(format!(
                "unknown log-level '{}', expected one of: {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            )));
        }

        for pattern in &self.cc.which_list {
            Regex::new(pattern).map_err(|e| Error::invalid_pattern(pattern, e))?;
        }

        Ok(())
    }
}
