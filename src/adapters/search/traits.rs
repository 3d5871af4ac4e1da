//! Search backend abstraction
//!
//! The ingest pipeline only talks to the backend through [`SearchBackend`],
//! so the Elasticsearch REST client can be swapped for a fake in tests.

use crate::domain::BackendError;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

/// Result type for backend calls
pub type BackendResult<T> = std::result::Result<T, BackendError>;

/// Text analysis applied when an index is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexAnalysis {
    /// Backend defaults (tokenized text)
    Standard,
    /// The `keyword` analyzer is the index default, so string fields are
    /// matched as whole values ("C#" stays "C#")
    KeywordDefault,
}

impl IndexAnalysis {
    /// Request body for the create-index call, if any
    pub fn settings_body(&self) -> Option<Value> {
        match self {
            IndexAnalysis::Standard => None,
            IndexAnalysis::KeywordDefault => Some(json!({
                "settings": {
                    "analysis": {
                        "analyzer": {
                            "default": { "type": "keyword" }
                        }
                    }
                }
            })),
        }
    }
}

/// Acknowledgement of an indexing write
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexedDocument {
    /// Identifier the document was stored under
    #[serde(rename = "_id")]
    pub id: String,

    /// "created" or "updated"
    #[serde(default)]
    pub result: Option<String>,
}

/// Operations the ingest pipeline needs from the search backend
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Whether an index exists
    async fn index_exists(&self, index: &str) -> BackendResult<bool>;

    /// Create an index with the given analysis settings
    ///
    /// Creating an index that already exists is not an error.
    async fn create_index(&self, index: &str, analysis: IndexAnalysis) -> BackendResult<()>;

    /// Index a document
    ///
    /// With `Some(id)` this is an upsert at that identifier; with `None`
    /// the backend assigns one.
    async fn index_document(
        &self,
        index: &str,
        kind: &str,
        id: Option<&str>,
        body: &str,
    ) -> BackendResult<IndexedDocument>;

    /// Fetch the source of a document by identifier
    ///
    /// Returns `Ok(None)` when the document does not exist.
    async fn get_document(&self, index: &str, kind: &str, id: &str)
        -> BackendResult<Option<Value>>;

    /// Human-readable endpoint for log messages
    fn endpoint(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_default_settings() {
        let body = IndexAnalysis::KeywordDefault.settings_body().unwrap();
        assert_eq!(
            body["settings"]["analysis"]["analyzer"]["default"]["type"],
            "keyword"
        );
        assert!(IndexAnalysis::Standard.settings_body().is_none());
    }

    #[test]
    fn test_indexed_document_deserialize() {
        let doc: IndexedDocument = serde_json::from_str(
            r#"{"_index":"github","_type":"repos","_id":"abc","_version":2,"result":"updated"}"#,
        )
        .unwrap();
        assert_eq!(doc.id, "abc");
        assert_eq!(doc.result.as_deref(), Some("updated"));
    }
}
