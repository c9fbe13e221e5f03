//! Configuration loading and resolution
//!
//! Bootstrap configuration comes from a TOML file. Settings are resolved in
//! priority order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. TOML config file
//! 4. Compiled defaults (fallback)
//!
//! A missing config file is not fatal: compiled defaults are used and the
//! binary logs a warning.

use crate::currency::DEFAULT_JPY_TO_IDR;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "SRW_CONFIG";

/// Config file name looked up under the user config directory
pub const CONFIG_FILE_NAME: &str = "srw-api.toml";

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://www.showroom-live.com";
pub const DEFAULT_PROFILE_TIMEOUT_MS: u64 = 3000;
pub const DEFAULT_CONCURRENT_LIMIT: usize = 5;

/// Theater shows ranked on the paid-live summary
pub const DEFAULT_SHOWS: [&str; 7] = [
    "Cara Meminum Ramune",
    "Aturan Anti Cinta",
    "Ingin Bertemu",
    "Tunas di Balik Seragam",
    "Banzai",
    "Pajama",
    "11th Anniversary Event",
];

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub data: DataConfig,
    pub currency: CurrencyConfig,
    /// Reference show titles for the paid-live ranking
    pub shows: Vec<String>,
    pub logging: LoggingConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            upstream: UpstreamConfig::default(),
            data: DataConfig::default(),
            currency: CurrencyConfig::default(),
            shows: DEFAULT_SHOWS.iter().map(|s| s.to_string()).collect(),
            logging: LoggingConfig::default(),
        }
    }
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Front-end build served for unmatched routes
    pub static_dir: Option<PathBuf>,
    /// Allow any origin (the front-end is usually hosted elsewhere)
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            static_dir: None,
            cors_permissive: true,
        }
    }
}

/// Upstream (SHOWROOM) client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Deadline for a single room profile request
    pub profile_timeout_ms: u64,
    /// Room profile requests in flight per wave
    pub concurrent_limit: usize,
    /// Overall timeout for other upstream requests (history page)
    pub request_timeout_ms: u64,
    /// Timeout for image downloads
    pub image_timeout_ms: u64,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            profile_timeout_ms: DEFAULT_PROFILE_TIMEOUT_MS,
            concurrent_limit: DEFAULT_CONCURRENT_LIMIT,
            request_timeout_ms: 30_000,
            image_timeout_ms: 10_000,
            user_agent: format!("srw-api/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl UpstreamConfig {
    pub fn profile_timeout(&self) -> Duration {
        Duration::from_millis(self.profile_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_millis(self.image_timeout_ms)
    }
}

/// Dataset file locations; bundled data is used for any path left unset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub rooms_path: Option<PathBuf>,
    pub trainees_path: Option<PathBuf>,
    pub setlists_path: Option<PathBuf>,
}

/// Paid-live currency conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyConfig {
    pub jpy_to_idr_rate: f64,
    /// Append a literal "0" to the converted amount before formatting
    pub legacy_trailing_zero: bool,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            jpy_to_idr_rate: DEFAULT_JPY_TO_IDR,
            legacy_trailing_zero: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Command-line / environment overrides applied on top of the TOML file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub rooms_path: Option<PathBuf>,
    pub trainees_path: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from `path`, or compiled defaults if there is no file
    ///
    /// Does not log; it runs before the tracing subscriber is installed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.filter(|p| p.exists()) else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Apply command-line / environment overrides (highest priority)
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(path) = overrides.rooms_path {
            self.data.rooms_path = Some(path);
        }
        if let Some(path) = overrides.trainees_path {
            self.data.trainees_path = Some(path);
        }
        if let Some(dir) = overrides.static_dir {
            self.server.static_dir = Some(dir);
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Reject values the services cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.upstream.concurrent_limit == 0 {
            return Err(Error::Config(
                "upstream.concurrent_limit must be at least 1".to_string(),
            ));
        }
        if self.upstream.profile_timeout_ms == 0 {
            return Err(Error::Config(
                "upstream.profile_timeout_ms must be greater than 0".to_string(),
            ));
        }
        let rate = self.currency.jpy_to_idr_rate;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::Config(format!(
                "currency.jpy_to_idr_rate must be a positive number, got {}",
                rate
            )));
        }
        if self.upstream.base_url.trim().is_empty() {
            return Err(Error::Config("upstream.base_url is empty".to_string()));
        }
        Ok(())
    }

    /// Address string for the TCP listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }
}

/// Locate the config file
///
/// Priority: command-line path, then `SRW_CONFIG`, then
/// `<user config dir>/srw/srw-api.toml` if it exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|d| d.join("srw").join(CONFIG_FILE_NAME))
        .filter(|p| p.exists())
}
