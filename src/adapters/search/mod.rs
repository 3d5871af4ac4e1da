//! Search backend abstraction layer
//!
//! Trait-based access to the index store, with an Elasticsearch REST
//! implementation.

pub mod elasticsearch;
pub mod traits;

pub use elasticsearch::ElasticsearchClient;
pub use traits::{BackendResult, IndexAnalysis, IndexedDocument, SearchBackend};
