//! Configuration loading and resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! Command-line arguments and environment variables are both collected by the
//! binary's `clap` parser and handed over as [`ConfigOverrides`].
//!
//! A missing or unreadable TOML file never terminates startup: a warning is
//! logged and compiled defaults are used instead.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default HTTP port for tunescope-web
pub const DEFAULT_PORT: u16 = 5780;

/// Default base URL for the video-search and lyrics endpoints
pub const DEFAULT_LOCAL_API_URL: &str = "http://localhost:3000";

/// Default base URL for the music catalog web API
pub const DEFAULT_CATALOG_API_URL: &str = "https://api.spotify.com/v1";

/// Configuration loaded from `config.toml`
///
/// Every field has a compiled default, so an empty file is a valid config.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Interface the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Base URL hosting `/api/music-videos`
    #[serde(default = "default_local_api_url")]
    pub video_api_url: String,

    /// Base URL hosting `/api/lyrics`
    #[serde(default = "default_local_api_url")]
    pub lyrics_api_url: String,

    /// Base URL of the music catalog web API
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// Timeout applied to every outbound HTTP request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of events buffered by the event bus before old ones are dropped
    #[serde(default = "default_event_bus_capacity")]
    pub event_bus_capacity: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            video_api_url: default_local_api_url(),
            lyrics_api_url: default_local_api_url(),
            catalog_api_url: default_catalog_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            event_bus_capacity: default_event_bus_capacity(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_local_api_url() -> String {
    DEFAULT_LOCAL_API_URL.to_string()
}

fn default_catalog_api_url() -> String {
    DEFAULT_CATALOG_API_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_event_bus_capacity() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Outcome of locating and reading the config file
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    /// Loaded from this file
    File(PathBuf),
    /// No file at this path; compiled defaults used
    Missing(PathBuf),
    /// Platform config directory unknown; compiled defaults used
    NoConfigDir,
    /// File present but unusable; compiled defaults used
    Invalid { path: PathBuf, error: String },
}

impl ConfigSource {
    /// Log the outcome at the level it deserves
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::Missing(path) => {
                info!("No config file at {}, using compiled defaults", path.display())
            }
            ConfigSource::NoConfigDir => {
                warn!("Could not determine config directory, using compiled defaults")
            }
            ConfigSource::Invalid { path, error } => {
                warn!("Ignoring config file {}: {}", path.display(), error)
            }
        }
    }
}

/// Values supplied on the command line or through the environment
///
/// `None` means "not given", leaving the TOML or default value in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub video_api_url: Option<String>,
    pub lyrics_api_url: Option<String>,
    pub catalog_api_url: Option<String>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse a config file, failing on I/O or syntax errors
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        let config: TomlConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from `explicit` or the platform default location
    ///
    /// Falls back to compiled defaults with a warning when the file is absent
    /// or invalid.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let (config, source) = Self::resolve(explicit);
        source.log();
        config
    }

    /// Like [`load_or_default`](Self::load_or_default), but hands back where
    /// the config came from instead of logging it
    ///
    /// Used before the tracing subscriber exists; the caller logs the
    /// [`ConfigSource`] once logging is up.
    pub fn resolve(explicit: Option<&Path>) -> (Self, ConfigSource) {
        let path = match explicit.map(Path::to_path_buf).or_else(default_config_path) {
            Some(path) => path,
            None => return (Self::default(), ConfigSource::NoConfigDir),
        };

        if !path.exists() {
            return (Self::default(), ConfigSource::Missing(path));
        }

        match Self::load(&path) {
            Ok(config) => (config, ConfigSource::File(path)),
            Err(e) => (
                Self::default(),
                ConfigSource::Invalid {
                    path,
                    error: e.to_string(),
                },
            ),
        }
    }

    /// Apply command-line/environment overrides on top of this config
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(addr) = overrides.bind_address {
            self.bind_address = addr;
        }
        if let Some(url) = overrides.video_api_url {
            self.video_api_url = url;
        }
        if let Some(url) = overrides.lyrics_api_url {
            self.lyrics_api_url = url;
        }
        if let Some(url) = overrides.catalog_api_url {
            self.catalog_api_url = url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        self
    }

    /// Apply overrides only if the result still validates
    ///
    /// On rejection `self` is returned unchanged together with the reason.
    pub fn with_checked_overrides(self, overrides: ConfigOverrides) -> (Self, Option<Error>) {
        let candidate = self.clone().with_overrides(overrides);
        match candidate.validate() {
            Ok(()) => (candidate, None),
            Err(e) => (self, Some(e)),
        }
    }

    /// Reject values no component can work with
    pub fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("video_api_url", &self.video_api_url),
            ("lyrics_api_url", &self.lyrics_api_url),
            ("catalog_api_url", &self.catalog_api_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::Config(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::Config("request_timeout_secs must be at least 1".to_string()));
        }
        if self.event_bus_capacity == 0 {
            return Err(Error::Config("event_bus_capacity must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Socket address string for the HTTP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Platform config file location: `<config_dir>/tunescope/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tunescope").join("config.toml"))
}
