//! Drop share ingest
//!
//! - [`extractor`] - turns a dropped file into records
//! - [`writer`] - writes one record, with the `_id` recovery retry
//! - [`coordinator`] - runs a full discovery-and-ingest cycle
//! - [`summary`] - per-cycle and per-file counters

pub mod coordinator;
pub mod extractor;
pub mod summary;
pub mod writer;

pub use coordinator::{ensure_log_index, IngestCoordinator};
pub use extractor::{extract_records, read_records, route};
pub use summary::{CycleSummary, FileSummary};
pub use writer::{ContainerCheck, IndexWriter, PayloadId, WriteFailure, WriteOutcome};
