//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! Server settings come from two sources (later overrides earlier):
//! 1. A toml config file
//! 2. Environment variables
//!
//! # Config file locations
//!
//! Searched in order:
//! 1. `$GERRIT_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/gerrit-cli/config.toml`
//! 3. `~/.config/gerrit-cli/config.toml` (canonical write location)
//!
//! # Environment variables
//!
//! - `GERRIT_URL`: server base URL
//! - `GERRIT_USERNAME`: username
//! - `GERRIT_PASSWORD`: HTTP password (preferred)
//! - `GERRIT_TOKEN`: HTTP token (fallback when no password)
//!
//! # Example
//!
//! ```ignore
//! use gerrit_cli::core::config::Config;
//!
//! let config = Config::load()?;
//! let server = config.server()?;
//! println!("talking to {}", server.url);
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::env;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error(
        "missing required settings: {}\n\
         Set them in the config file or as environment variables \
         (GERRIT_URL, GERRIT_USERNAME, GERRIT_PASSWORD or GERRIT_TOKEN).",
        .0.join(", ")
    )]
    MissingSettings(Vec<String>),
}

/// Resolved server connection settings.
///
/// Produced by [`Config::server`] once all three required values are
/// present. The trailing slash on the URL is normalized away so request
/// paths can be joined naively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server base URL, without trailing slash.
    pub url: String,
    /// Username for HTTP authentication.
    pub username: String,
    /// Password or HTTP token.
    pub password: String,
}

/// Merged configuration from file and environment.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values from the config file (if one was found).
    pub file: FileConfig,
    /// Path the file config was loaded from.
    file_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default locations.
    ///
    /// A missing config file is not an error (environment variables may
    /// carry everything); a file that exists but cannot be read or parsed
    /// is.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = config_file_path() {
            if path.exists() {
                let text = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
                    path: path.clone(),
                    source,
                })?;
                let file: FileConfig =
                    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
                        path: path.clone(),
                        message: e.to_string(),
                    })?;
                file.validate()?;
                config.file = file;
                config.file_path = Some(path);
            }
        }

        Ok(config)
    }

    /// Path the file config was loaded from, if any.
    pub fn file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Whether interactive mode is configured on (defaults to unset).
    pub fn interactive(&self) -> Option<bool> {
        self.file.interactive
    }

    /// Resolve the server connection settings.
    ///
    /// Environment variables override file values. `GERRIT_PASSWORD` wins
    /// over `GERRIT_TOKEN`, matching the file-level `password`/`token`
    /// precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingSettings` naming every absent value, or
    /// `ConfigError::InvalidValue` for a malformed URL.
    pub fn server(&self) -> Result<ServerConfig, ConfigError> {
        let url = env_nonempty("GERRIT_URL").or_else(|| self.file.url.clone());
        let username = env_nonempty("GERRIT_USERNAME").or_else(|| self.file.username.clone());
        let password = env_nonempty("GERRIT_PASSWORD")
            .or_else(|| env_nonempty("GERRIT_TOKEN"))
            .or_else(|| self.file.password.clone())
            .or_else(|| self.file.token.clone());

        let mut missing = Vec::new();
        if url.is_none() {
            missing.push("url (GERRIT_URL)".to_string());
        }
        if username.is_none() {
            missing.push("username (GERRIT_USERNAME)".to_string());
        }
        if password.is_none() {
            missing.push("password (GERRIT_PASSWORD or GERRIT_TOKEN)".to_string());
        }
        if !missing.is_empty() {
            return Err(ConfigError::MissingSettings(missing));
        }

        let url = url.unwrap_or_default();
        schema::validate_url(&url)?;

        Ok(ServerConfig {
            url: url.trim_end_matches('/').to_string(),
            username: username.unwrap_or_default(),
            password: password.unwrap_or_default(),
        })
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_nonempty(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

/// Locate the config file.
///
/// `$GERRIT_CONFIG` takes precedence, then the XDG config directory.
fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = env_nonempty("GERRIT_CONFIG") {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("gerrit-cli").join("config.toml"))
}
