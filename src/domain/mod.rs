//! Domain models and types for Dropshare.
//!
//! The domain layer provides:
//! - **Records** ([`Record`]) - one JSON document plus its index/type routing
//! - **Error types** ([`DropshareError`], [`BackendError`], [`ExtractError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, DropshareError>`]:
//!
//! ```rust,no_run
//! use dropshare::domain::Result;
//!
//! fn example() -> Result<()> {
//!     // Errors are automatically converted using the ? operator
//!     let config = dropshare::config::load_config("dropshare.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{BackendError, DropshareError, ExtractError};
pub use record::Record;
pub use result::Result;
