//! Logging and observability
//!
//! Structured logging through `tracing`, with:
//! - Configurable log levels
//! - Console output
//! - JSON log files with daily or hourly rotation
//!
//! The per-run audit trail that is written to the search backend lives in
//! [`crate::core::audit`]; every audit message is also emitted here.
//!
//! # Example
//!
//! ```no_run
//! use dropshare::logging::init_logging;
//! use dropshare::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
