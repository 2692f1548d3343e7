//! Configuration for the event tracker.
//!
//! Loadable from `foxlog.toml`; every field has a default so an empty file
//! (or no file at all) is valid. Environment variables override the file.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FoxlogConfig {
    /// Upstream war service settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Polling and output settings.
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FoxlogConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `FoxlogError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::FoxlogError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Apply overrides from the process environment.
    ///
    /// Environment variables:
    /// - `FOXLOG_API_BASE_URL` - war service base URL
    /// - `FOXLOG_REQUEST_TIMEOUT_SECS` - per-request timeout (default: 10)
    /// - `FOXLOG_POLL_INTERVAL_SECS` - sleep between cycles (default: 20)
    /// - `FOXLOG_OUTPUT_DIR` - directory for event files
    /// - `FOXLOG_LOG_LEVEL` - default log level (default: info)
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides from `lookup`, keyed by the variable names listed on
    /// [`Self::with_env_overrides`]. Numeric values that fail to parse are
    /// ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        if let Some(url) = lookup("FOXLOG_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(secs) = number("FOXLOG_REQUEST_TIMEOUT_SECS") {
            self.api.request_timeout_secs = secs;
        }
        if let Some(secs) = number("FOXLOG_POLL_INTERVAL_SECS") {
            self.tracker.poll_interval_secs = secs;
        }
        if let Some(dir) = lookup("FOXLOG_OUTPUT_DIR") {
            self.tracker.output_dir = PathBuf::from(dir);
        }
        if let Some(level) = lookup("FOXLOG_LOG_LEVEL") {
            self.logging.level = level;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// War service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout applied to every request.
    #[serde(default = "default_10")]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    /// Per-request timeout, never below one second.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: 10,
        }
    }
}

/// Polling loop and output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Seconds to sleep between cycles.
    #[serde(default = "default_20")]
    pub poll_interval_secs: u64,
    /// Where per-war event files are written.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl TrackerConfig {
    /// Poll interval, never below one second.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 20,
            output_dir: default_output_dir(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive: trace, debug, info, warn, error.
    /// `RUST_LOG` takes precedence when set.
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

// ---------------------------------------------------------------------------
// Default value functions (required by serde)
// ---------------------------------------------------------------------------

fn default_base_url() -> String {
    "https://war-service-live.foxholeservices.com/api".to_string()
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("live_war_events")
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_10() -> u64 {
    10
}
fn default_20() -> u64 {
    20
}
