//! Cycle summary and reporting
//!
//! Counters collected by one ingest cycle, returned from
//! [`IngestCoordinator::run_once`](super::IngestCoordinator::run_once).

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of processing a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    /// File that was processed
    pub path: PathBuf,

    /// Records extracted from the file
    pub records: usize,

    /// Records written (including recovered ones)
    pub indexed: usize,

    /// Records written only after renaming `_id` to `old_id`
    pub recovered: usize,

    /// Records that could not be written
    pub failed: usize,
}

impl FileSummary {
    /// Create an empty summary for a file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: 0,
            indexed: 0,
            recovered: 0,
            failed: 0,
        }
    }

    /// Whether extraction produced nothing to write
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

/// Summary of one ingest cycle
#[derive(Debug, Clone)]
pub struct CycleSummary {
    /// Run identifier the audit entries were written under
    pub run_id: String,

    /// Watermark the candidates were selected against
    pub previous_watermark: DateTime<Utc>,

    /// Watermark persisted at the end of the cycle
    pub watermark: DateTime<Utc>,

    /// Whether the new watermark was saved to the backend
    pub watermark_saved: bool,

    /// Files selected for this cycle
    pub candidates: usize,

    /// Per-file results, in processing order
    pub files: Vec<FileSummary>,

    /// Whether enumerating the drop share failed
    pub discovery_failed: bool,

    /// Whether the ingest phase panicked before finishing
    pub aborted: bool,

    /// Duration of the cycle
    pub duration: Duration,
}

impl CycleSummary {
    /// Create an empty summary for a run
    pub fn new(run_id: impl Into<String>, previous_watermark: DateTime<Utc>) -> Self {
        Self {
            run_id: run_id.into(),
            previous_watermark,
            watermark: previous_watermark,
            watermark_saved: false,
            candidates: 0,
            files: Vec::new(),
            discovery_failed: false,
            aborted: false,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Total records extracted
    pub fn total_records(&self) -> usize {
        self.files.iter().map(|f| f.records).sum()
    }

    /// Total records written
    pub fn total_indexed(&self) -> usize {
        self.files.iter().map(|f| f.indexed).sum()
    }

    /// Total records written after `_id` recovery
    pub fn total_recovered(&self) -> usize {
        self.files.iter().map(|f| f.recovered).sum()
    }

    /// Total records not written
    pub fn total_failed(&self) -> usize {
        self.files.iter().map(|f| f.failed).sum()
    }

    /// Files that yielded no records
    pub fn empty_files(&self) -> usize {
        self.files.iter().filter(|f| f.is_empty()).count()
    }

    /// Check if the cycle ran cleanly
    pub fn is_successful(&self) -> bool {
        !self.discovery_failed && !self.aborted && self.watermark_saved && self.total_failed() == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            candidates = self.candidates,
            files_processed = self.files.len(),
            empty_files = self.empty_files(),
            records = self.total_records(),
            indexed = self.total_indexed(),
            recovered = self.total_recovered(),
            failed = self.total_failed(),
            watermark = %self.watermark.to_rfc3339(),
            duration_ms = self.duration.as_millis() as u64,
            "Ingest cycle completed"
        );

        if self.aborted {
            tracing::error!(run_id = %self.run_id, "Ingest phase aborted before finishing");
        }
        if !self.watermark_saved {
            tracing::warn!(run_id = %self.run_id, "Watermark was not persisted");
        }
    }
}
