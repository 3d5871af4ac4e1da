//! Configuration schema types
//!
//! This module defines the configuration structure for Dropshare.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Order in which candidate files are processed within one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileOrder {
    /// Whatever order the directory walk produces
    #[default]
    Enumeration,
    /// Least recently modified first
    OldestFirst,
}

/// Main Dropshare configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropshareConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Watched drop share
    pub dropshare: DropShareConfig,

    /// Search backend connection
    pub backend: BackendConfig,

    /// Cycle scheduling
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DropshareConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.dropshare.validate()?;
        self.backend.validate()?;
        self.schedule.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Drop share configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropShareConfig {
    /// Root directory that producers drop JSON files into.
    /// The first directory below it names the destination index.
    pub root: PathBuf,

    /// Processing order of candidate files
    #[serde(default)]
    pub order: FileOrder,
}

impl DropShareConfig {
    fn validate(&self) -> Result<(), String> {
        if self.root.as_os_str().is_empty() {
            return Err("dropshare.root cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Elasticsearch backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the cluster, e.g. `http://localhost:9200`
    pub url: String,

    /// Username for basic authentication (optional)
    #[serde(default)]
    pub username: Option<String>,

    /// Password for basic authentication (optional)
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Address documents as `/{index}/{type}` (legacy mapping types).
    /// When false the typeless `/{index}/_doc` endpoints are used.
    #[serde(default = "default_true")]
    pub mapping_types: bool,

    /// Index holding the audit log and the watermark document
    #[serde(default = "default_log_index")]
    pub log_index: String,

    /// Document type of the watermark document
    #[serde(default = "default_watermark_kind")]
    pub watermark_kind: String,

    /// Document id of the watermark document
    #[serde(default = "default_watermark_id")]
    pub watermark_id: String,
}

impl BackendConfig {
    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.url.is_empty() {
            return Err("backend.url cannot be empty".to_string());
        }

        let parsed = url::Url::parse(&self.url)
            .map_err(|e| format!("backend.url '{}' is not a valid URL: {e}", self.url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err("backend.url must start with http:// or https://".to_string());
        }

        if self.password.is_some() && self.username.as_deref().unwrap_or("").is_empty() {
            return Err("backend.username is required when backend.password is set".to_string());
        }

        if let Some(password) = &self.password {
            if password.expose_secret().is_empty() {
                return Err("backend.password cannot be empty when provided".to_string());
            }
        }

        if self.timeout_seconds == 0 {
            return Err("backend.timeout_seconds must be > 0".to_string());
        }

        if self.log_index.is_empty() || self.log_index != self.log_index.to_lowercase() {
            return Err(format!(
                "backend.log_index '{}' must be a non-empty lowercase index name",
                self.log_index
            ));
        }

        if self.watermark_kind.is_empty() || self.watermark_id.is_empty() {
            return Err(
                "backend.watermark_kind and backend.watermark_id cannot be empty".to_string(),
            );
        }

        Ok(())
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:9200".to_string(),
            username: None,
            password: None,
            timeout_seconds: default_timeout_seconds(),
            mapping_types: true,
            log_index: default_log_index(),
            watermark_kind: default_watermark_kind(),
            watermark_id: default_watermark_id(),
        }
    }
}

/// Scheduling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Minutes to sleep between two ingest cycles
    #[serde(default = "default_sleep_interval_minutes")]
    pub sleep_interval_minutes: u64,
}

impl ScheduleConfig {
    fn validate(&self) -> Result<(), String> {
        if !(1..=1440).contains(&self.sleep_interval_minutes) {
            return Err(format!(
                "schedule.sleep_interval_minutes must be between 1 and 1440, got {}",
                self.sleep_interval_minutes
            ));
        }
        Ok(())
    }

    /// Sleep interval as a [`Duration`]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.sleep_interval_minutes * 60)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            sleep_interval_minutes: default_sleep_interval_minutes(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default = "default_true")]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".into());
        }

        Ok(())
    }

    /// Console-only logging, used before a configuration file is loaded
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            local_path: String::new(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: true,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_log_index() -> String {
    "logs".to_string()
}

fn default_watermark_kind() -> String {
    "lastruntime".to_string()
}

fn default_watermark_id() -> String {
    "1".to_string()
}

fn default_sleep_interval_minutes() -> u64 {
    5
}

fn default_local_path() -> String {
    "/var/log/dropshare".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
