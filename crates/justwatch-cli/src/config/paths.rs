//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Config file name inside the config directory.
const CONFIG_FILE: &str = "config.toml";

/// Application directory under the XDG config home.
const APP_DIR: &str = "justwatch";

/// Resolves the config file path.
///
/// Precedence: `{dir}/config.toml`, then
/// `$XDG_CONFIG_HOME/justwatch/config.toml`, then
/// `~/.config/justwatch/config.toml`.
///
/// # Errors
///
/// Returns an error if neither `dir`, `XDG_CONFIG_HOME` nor `HOME` is available.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    resolve_from(
        dir.map(PathBuf::as_path),
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

/// Applies the lookup precedence to already-read environment values.
fn resolve_from(
    dir: Option<&Path>,
    xdg_config_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(d) = dir {
        return Ok(d.join(CONFIG_FILE));
    }
    if let Some(xdg) = xdg_config_home.filter(|p| p.is_absolute()) {
        return Ok(xdg.join(APP_DIR).join(CONFIG_FILE));
    }
    if let Some(home) = home {
        return Ok(home.join(".config").join(APP_DIR).join(CONFIG_FILE));
    }
    bail!("cannot locate config directory: neither XDG_CONFIG_HOME nor HOME is set");
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_explicit_dir_wins() {
        // Arrange
        let dir = PathBuf::from("/tmp/justwatch-test");

        // Act
        let path = resolve_from(
            Some(&dir),
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/tmp/justwatch-test/config.toml"));
    }

    #[test]
    fn test_xdg_config_home() {
        // Arrange & Act
        let path = resolve_from(
            None,
            Some(PathBuf::from("/xdg")),
            Some(PathBuf::from("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/xdg/justwatch/config.toml"));
    }

    #[test]
    fn test_relative_xdg_is_ignored() {
        // Arrange & Act
        let path = resolve_from(
            None,
            Some(PathBuf::from("relative")),
            Some(PathBuf::from("/home/u")),
        )
        .unwrap();

        // Assert
        assert_eq!(path, PathBuf::from("/home/u/.config/justwatch/config.toml"));
    }

    #[test]
    fn test_no_location_is_error() {
        // Arrange & Act
        let result = resolve_from(None, None, None);

        // Assert
        assert!(result.is_err());
    }
}
