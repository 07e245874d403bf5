//! `ClientConfig` - per-client locale and proxy settings.

use serde::{Deserialize, Serialize};

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en_US";

/// Client configuration, fixed at construction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::module_name_repetitions)]
pub struct ClientConfig {
    /// Catalog locale interpolated into every path (e.g. `en_US`, `de_DE`).
    pub locale: String,
    /// Outbound proxy address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// Proxy type, forwarded as the `proxy-type` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_type: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            locale: String::from(DEFAULT_LOCALE),
            proxy: None,
            proxy_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_default_locale() {
        // Arrange & Act
        let config = ClientConfig::default();

        // Assert
        assert_eq!(config.locale, "en_US");
        assert!(config.proxy.is_none());
        assert!(config.proxy_type.is_none());
    }

    #[test]
    fn test_deserialize_partial_fills_defaults() {
        // Arrange
        let json = r#"{"proxy":"http://127.0.0.1:3128"}"#;

        // Act
        let config: ClientConfig = serde_json::from_str(json).unwrap();

        // Assert
        assert_eq!(config.locale, DEFAULT_LOCALE);
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:3128"));
    }

    #[test]
    fn test_serialize_skips_unset_proxy() {
        // Arrange
        let config = ClientConfig {
            locale: String::from("de_DE"),
            ..ClientConfig::default()
        };

        // Act
        let json = serde_json::to_string(&config).unwrap();

        // Assert
        assert_eq!(json, r#"{"locale":"de_DE"}"#);
    }
}
