//! Integration tests for logging functionality
//!
//! A process can only install one global subscriber, so everything that
//! calls `init_logging` lives in a single test.

use dropshare::config::LoggingConfig;
use dropshare::logging::init_logging;
use tempfile::TempDir;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(config.local_enabled);
    assert_eq!(config.local_rotation, "daily");
    assert_eq!(config.local_path, "/var/log/dropshare");
}

#[test]
fn test_console_only_config() {
    let config = LoggingConfig::console_only();
    assert!(!config.local_enabled);
    assert!(config.local_path.is_empty());
}

#[test]
fn test_init_logging_creates_directory_once() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().to_string(),
        local_rotation: "hourly".to_string(),
    };

    assert!(init_logging("loud", &config).is_err());
    assert!(!log_path.exists());

    let guard = init_logging("debug", &config).unwrap();
    assert!(log_path.is_dir());
    tracing::info!(test = "logging", "written to the rolling file");

    // The global subscriber is already installed
    assert!(init_logging("info", &LoggingConfig::console_only()).is_err());
    drop(guard);
}
