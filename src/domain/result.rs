//! Result type alias for Dropshare

use super::errors::DropshareError;

/// Result type alias for Dropshare operations
///
/// # Examples
///
/// ```
/// use dropshare::domain::result::Result;
/// use dropshare::domain::errors::DropshareError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(DropshareError::State("watermark unreadable".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DropshareError>;
