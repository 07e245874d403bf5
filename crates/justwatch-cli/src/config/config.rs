//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use justwatch_api::ClientConfig;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Client defaults (locale, proxy).
    #[serde(default)]
    pub client: ClientConfig,
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Default)]
pub struct ClientOverrides {
    /// `--locale`.
    pub locale: Option<String>,
    /// `--proxy`.
    pub proxy: Option<String>,
    /// `--proxy-type`.
    pub proxy_type: Option<String>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        std::fs::write(path, self.to_toml()?)
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Renders the config as TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config to TOML")
    }

    /// Applies command-line overrides on top of the file values.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ClientOverrides) -> Self {
        if let Some(locale) = overrides.locale {
            self.client.locale = locale;
        }
        if overrides.proxy.is_some() {
            self.client.proxy = overrides.proxy;
        }
        if overrides.proxy_type.is_some() {
            self.client.proxy_type = overrides.proxy_type;
        }
        self
    }
}
