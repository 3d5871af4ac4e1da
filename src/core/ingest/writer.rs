//! Index writer
//!
//! Persists one record at a time. A record whose `_id` the backend rejects
//! gets exactly one recovery attempt: `_id` is renamed to `old_id` and the
//! document is written again under a backend-assigned identifier.

use crate::adapters::search::{IndexAnalysis, IndexedDocument, SearchBackend};
use crate::core::audit::RunLog;
use crate::domain::{BackendError, Record};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Field carrying a caller-chosen document identifier
pub const ID_FIELD: &str = "_id";

/// Field the identifier is moved to when the backend refuses it
pub const RENAMED_ID_FIELD: &str = "old_id";

/// Result of making sure a destination index exists
#[derive(Debug, Clone)]
pub enum ContainerCheck {
    /// The index was already there
    Exists,
    /// The index was created with keyword analysis
    Created,
    /// The check or the creation failed; the write goes ahead regardless
    Failed(BackendError),
}

/// Identifier found in a record payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadId {
    /// The payload is an object with a string or numeric `_id`
    Present(String),
    /// The payload is an object without a usable `_id`
    Absent,
    /// The payload is not a JSON object
    Unparseable,
}

impl PayloadId {
    /// Inspect a serialized payload
    ///
    /// # Examples
    ///
    /// ```
    /// use dropshare::core::ingest::PayloadId;
    ///
    /// assert_eq!(PayloadId::inspect(r#"{"_id":"abc"}"#), PayloadId::Present("abc".into()));
    /// assert_eq!(PayloadId::inspect(r#"{"_id":7}"#), PayloadId::Present("7".into()));
    /// assert_eq!(PayloadId::inspect(r#"{"_id":null}"#), PayloadId::Absent);
    /// assert_eq!(PayloadId::inspect("not json"), PayloadId::Unparseable);
    /// ```
    pub fn inspect(payload: &str) -> Self {
        match serde_json::from_str::<Value>(payload) {
            Ok(Value::Object(map)) => match map.get(ID_FIELD) {
                Some(Value::String(id)) => PayloadId::Present(id.clone()),
                Some(Value::Number(id)) => PayloadId::Present(id.to_string()),
                _ => PayloadId::Absent,
            },
            _ => PayloadId::Unparseable,
        }
    }
}

/// Why a record could not be written
#[derive(Debug, Clone)]
pub enum WriteFailure {
    /// The only write attempt was rejected
    Rejected(BackendError),
    /// The write with an identifier was rejected and so was the retry
    /// without one
    RecoveryFailed {
        first: BackendError,
        retry: BackendError,
    },
}

impl fmt::Display for WriteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteFailure::Rejected(e) => write!(f, "{e}"),
            WriteFailure::RecoveryFailed { first, retry } => {
                write!(f, "write with _id failed ({first}); retry as old_id failed ({retry})")
            }
        }
    }
}

/// Result of writing one record
#[derive(Debug, Clone)]
pub enum WriteOutcome {
    /// Written on the first attempt
    Indexed(IndexedDocument),
    /// Written after renaming `_id` to `old_id`
    Recovered(IndexedDocument),
    /// Not written
    Failed(WriteFailure),
}

impl WriteOutcome {
    /// Whether the record ended up in the backend
    pub fn is_success(&self) -> bool {
        !matches!(self, WriteOutcome::Failed(_))
    }

    /// Whether the `_id` recovery path was needed
    pub fn is_recovered(&self) -> bool {
        matches!(self, WriteOutcome::Recovered(_))
    }
}

/// Writes records to their destination index
#[derive(Clone)]
pub struct IndexWriter {
    backend: Arc<dyn SearchBackend>,
}

impl IndexWriter {
    /// Create a writer over a search backend
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self { backend }
    }

    /// Make sure an index exists, creating it with keyword analysis if not
    pub async fn ensure_container(&self, collection: &str, log: &RunLog) -> ContainerCheck {
        let result = match self.backend.index_exists(collection).await {
            Ok(true) => Ok(ContainerCheck::Exists),
            Ok(false) => self
                .backend
                .create_index(collection, IndexAnalysis::KeywordDefault)
                .await
                .map(|_| ContainerCheck::Created),
            Err(e) => Err(e),
        };

        match result {
            Ok(check) => {
                if matches!(check, ContainerCheck::Created) {
                    tracing::info!(index = %collection, "Created index with keyword analysis");
                }
                check
            }
            Err(e) => {
                log.error(format!(
                    "Error: unable to verify or create index {collection}: {e}"
                ))
                .await;
                ContainerCheck::Failed(e)
            }
        }
    }

    /// Write one record
    ///
    /// `source` is the file the record came from and only appears in audit
    /// messages. When `check_container` is set the destination index is
    /// ensured first. Failures are reported to the run log and returned as
    /// [`WriteOutcome::Failed`]; this never errors.
    pub async fn write(
        &self,
        record: &Record,
        source: &Path,
        check_container: bool,
        log: &RunLog,
    ) -> WriteOutcome {
        if check_container {
            self.ensure_container(record.collection(), log).await;
        }

        let outcome = match PayloadId::inspect(record.payload()) {
            PayloadId::Present(id) => self.write_with_id(record, &id, source, log).await,
            PayloadId::Absent | PayloadId::Unparseable => {
                match self.index(record, None, record.payload()).await {
                    Ok(doc) => WriteOutcome::Indexed(doc),
                    Err(e) => WriteOutcome::Failed(WriteFailure::Rejected(e)),
                }
            }
        };

        if let WriteOutcome::Failed(failure) = &outcome {
            log.error(format!(
                "Error: Failed to index a record in {}: {failure}",
                source.display()
            ))
            .await;
        }

        outcome
    }

    async fn write_with_id(
        &self,
        record: &Record,
        id: &str,
        source: &Path,
        log: &RunLog,
    ) -> WriteOutcome {
        let first = match self.index(record, Some(id), record.payload()).await {
            Ok(doc) => return WriteOutcome::Indexed(doc),
            Err(e) => e,
        };

        tracing::debug!(
            index = %record.collection(),
            id = %id,
            error = %first,
            "Write with _id rejected, retrying as old_id"
        );

        let Some(renamed) = rename_id_field(record.payload()) else {
            return WriteOutcome::Failed(WriteFailure::Rejected(first));
        };

        match self.index(record, None, &renamed).await {
            Ok(doc) => {
                log.info(format!(
                    "Recovered from ERROR - But had to rename _id field to old_id to index record in {}",
                    source.display()
                ))
                .await;
                WriteOutcome::Recovered(doc)
            }
            Err(retry) => WriteOutcome::Failed(WriteFailure::RecoveryFailed { first, retry }),
        }
    }

    async fn index(
        &self,
        record: &Record,
        id: Option<&str>,
        body: &str,
    ) -> Result<IndexedDocument, BackendError> {
        self.backend
            .index_document(record.collection(), record.kind(), id, body)
            .await
    }
}

/// Move the top-level `_id` value to `old_id`
///
/// Returns `None` if the payload is not an object carrying `_id`.
pub fn rename_id_field(payload: &str) -> Option<String> {
    let mut map: Map<String, Value> = serde_json::from_str(payload).ok()?;
    let id = map.remove(ID_FIELD)?;
    map.insert(RENAMED_ID_FIELD.to_string(), id);
    Some(Value::Object(map).to_string())
}
