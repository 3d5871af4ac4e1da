//! Record domain model
//!
//! A record is one JSON document pulled out of a dropped file, together with
//! the index and document type it is routed to.

use serde::Serialize;

/// One unit of work for the indexer
///
/// The routing names are lower-cased once when the record is built and can't
/// be changed afterwards. A record carries no identity of its own; the only
/// identifier is an optional `_id` field inside the payload.
///
/// # Examples
///
/// ```
/// use dropshare::domain::Record;
///
/// let record = Record::new(r#"{"v":1}"#, "GitHub", "MyDataFile");
/// assert_eq!(record.collection(), "github");
/// assert_eq!(record.kind(), "mydatafile");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    payload: String,
    collection: String,
    kind: String,
}

impl Record {
    /// Creates a record, case-folding the routing names
    pub fn new(
        payload: impl Into<String>,
        collection: impl AsRef<str>,
        kind: impl AsRef<str>,
    ) -> Self {
        Self {
            payload: payload.into(),
            collection: collection.as_ref().to_lowercase(),
            kind: kind.as_ref().to_lowercase(),
        }
    }

    /// Serialized JSON document
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Destination index name
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Destination document type name
    pub fn kind(&self) -> &str {
        &self.kind
    }
}
