//! Application configuration module.
//!
//! Manages the TOML config file holding default client settings
//! (locale, proxy).

#[allow(clippy::module_inception)]
mod config;
mod paths;

#[allow(clippy::module_name_repetitions)]
pub use config::{AppConfig, ClientOverrides};
pub use paths::resolve_config_path;
