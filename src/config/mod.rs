//! Configuration management for Dropshare.
//!
//! Dropshare reads a single TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DROPSHARE_<SECTION>_<KEY>` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [dropshare]
//! root = "/mnt/dropshare"
//! order = "enumeration"
//!
//! [backend]
//! url = "http://localhost:9200"
//! username = "elastic"
//! password = "${DROPSHARE_BACKEND_PASSWORD}"
//!
//! [schedule]
//! sleep_interval_minutes = 5
//! ```
//!
//! # Loading
//!
//! ```rust,no_run
//! use dropshare::config::load_config;
//!
//! # fn example() {
//! match load_config("dropshare.toml") {
//!     Ok(config) => println!("Watching {}", config.dropshare.root.display()),
//!     Err(e) => eprintln!("Configuration error: {}", e),
//! }
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BackendConfig, DropShareConfig, DropshareConfig, FileOrder, LoggingConfig,
    ScheduleConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
