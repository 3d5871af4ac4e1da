//! Watermark document model

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Naive layouts accepted when reading a stored watermark, taken as UTC
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Body of the watermark document
///
/// # Examples
///
/// ```
/// use dropshare::core::state::WatermarkDocument;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
/// let json = serde_json::to_value(WatermarkDocument::new(at)).unwrap();
/// assert_eq!(json["lastruntime"], "2024-03-01T12:00:00Z");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatermarkDocument {
    pub lastruntime: DateTime<Utc>,
}

impl WatermarkDocument {
    /// Wrap a watermark instant
    pub fn new(lastruntime: DateTime<Utc>) -> Self {
        Self { lastruntime }
    }

    /// Read the watermark out of a stored document source
    ///
    /// Returns `None` when the field is missing or not a recognizable
    /// timestamp.
    pub fn from_source(source: &Value) -> Option<DateTime<Utc>> {
        source
            .get("lastruntime")
            .and_then(Value::as_str)
            .and_then(parse_timestamp)
    }
}

/// Parse an RFC 3339 timestamp, or a naive ISO-8601 one interpreted as UTC
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc())
}
