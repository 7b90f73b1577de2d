//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Config file
//!
//! Located at (in order of precedence):
//! 1. `$GERRIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gerrit-cli/config.toml`
//! 3. `~/.config/gerrit-cli/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Config values are validated after parsing to ensure they conform to
//! expected formats (e.g., `url` must be an http(s) URL).

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// File-backed configuration.
///
/// All fields are optional in the file; environment variables fill in or
/// override them at load time. See [`super::Config::load`].
///
/// # Example
///
/// ```toml
/// url = "https://gerrit.example.com"
/// username = "jdoe"
/// token = "http-password-from-gerrit-settings"
/// interactive = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Gerrit server base URL.
    pub url: Option<String>,

    /// Username for HTTP authentication.
    pub username: Option<String>,

    /// HTTP password.
    pub password: Option<String>,

    /// HTTP token (alternative to `password`; password wins if both set).
    pub token: Option<String>,

    /// Default interactive mode.
    pub interactive: Option<bool>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(url) = &self.url {
            validate_url(url)?;
        }
        Ok(())
    }
}

/// Check that a server URL is a plausible http(s) base URL.
pub(super) fn validate_url(url: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::InvalidValue(format!(
            "url must be an http(s) URL, got '{}'",
            url
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_config_is_valid() {
        assert!(FileConfig::default().validate().is_ok());
    }

    #[test]
    fn http_and_https_urls_accepted() {
        for url in ["http://gerrit.local", "https://gerrit.example.com/"] {
            let config = FileConfig {
                url: Some(url.to_string()),
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "{url} should validate");
        }
    }

    #[test]
    fn non_http_url_rejected() {
        let config = FileConfig {
            url: Some("ssh://gerrit.example.com:29418".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_fields_rejected() {
        let parsed: Result<FileConfig, _> = toml::from_str("unknown_key = 1");
        assert!(parsed.is_err());
    }

    #[test]
    fn round_trips_through_toml() {
        let config = FileConfig {
            url: Some("https://gerrit.example.com".into()),
            username: Some("jdoe".into()),
            password: None,
            token: Some("secret".into()),
            interactive: Some(false),
        };
        let text = toml::to_string(&config).unwrap();
        let back: FileConfig = toml::from_str(&text).unwrap();
        assert_eq!(config, back);
    }
}
