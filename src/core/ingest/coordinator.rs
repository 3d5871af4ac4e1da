//! Ingest coordinator - runs one discovery-and-ingest cycle at a time
//!
//! A cycle lists the drop share, keeps the files modified after the current
//! watermark, writes every record they contain and finally persists a new
//! watermark taken right after discovery. Files touched while a cycle is
//! running are therefore picked up by the next one.

use crate::adapters::filesystem::{CandidateFile, FileSource, LocalDropShare};
use crate::adapters::search::{ElasticsearchClient, IndexAnalysis, SearchBackend};
use crate::config::{DropshareConfig, FileOrder};
use crate::core::audit::RunLog;
use crate::core::ingest::extractor::extract_records;
use crate::core::ingest::summary::{CycleSummary, FileSummary};
use crate::core::ingest::writer::IndexWriter;
use crate::core::state::StateManager;
use crate::domain::{DropshareError, Result};
use chrono::{DateTime, Utc};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Ingest coordinator
pub struct IngestCoordinator {
    root: PathBuf,
    order: FileOrder,
    log_index: String,
    backend: Arc<dyn SearchBackend>,
    source: Arc<dyn FileSource>,
    writer: IndexWriter,
    state: StateManager,
    watermark: DateTime<Utc>,
}

impl IngestCoordinator {
    /// Build a coordinator from configuration
    ///
    /// Connects to the backend, makes sure the log index exists and loads
    /// the stored watermark (or starts from now if there is none).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend client cannot be built or the log
    /// index cannot be checked or created.
    pub async fn from_config(config: &DropshareConfig) -> Result<Self> {
        let backend: Arc<dyn SearchBackend> =
            Arc::new(ElasticsearchClient::new(&config.backend)?);

        ensure_log_index(backend.as_ref(), &config.backend.log_index).await?;

        let state = StateManager::from_config(backend.clone(), &config.backend);
        let watermark = state.load_or_now().await;

        tracing::info!(
            root = %config.dropshare.root.display(),
            endpoint = %backend.endpoint(),
            watermark = %watermark.to_rfc3339(),
            "Ingest coordinator ready"
        );

        Ok(Self::new(
            config.dropshare.root.clone(),
            config.backend.log_index.clone(),
            backend,
            Arc::new(LocalDropShare::new()),
            state,
            watermark,
        )
        .with_order(config.dropshare.order))
    }

    /// Create a coordinator from its collaborators
    pub fn new(
        root: impl Into<PathBuf>,
        log_index: impl Into<String>,
        backend: Arc<dyn SearchBackend>,
        source: Arc<dyn FileSource>,
        state: StateManager,
        watermark: DateTime<Utc>,
    ) -> Self {
        Self {
            root: root.into(),
            order: FileOrder::default(),
            log_index: log_index.into(),
            writer: IndexWriter::new(backend.clone()),
            backend,
            source,
            state,
            watermark,
        }
    }

    /// Set the order candidates are processed in
    pub fn with_order(mut self, order: FileOrder) -> Self {
        self.order = order;
        self
    }

    /// Current in-memory watermark
    pub fn watermark(&self) -> DateTime<Utc> {
        self.watermark
    }

    /// Drop share root being watched
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Execute one cycle
    ///
    /// Never fails: discovery, extraction and write errors are reported to
    /// the run log and reflected in the returned summary. The new watermark
    /// is persisted even if the ingest phase panics.
    pub async fn run_once(&mut self) -> CycleSummary {
        let start_time = Instant::now();
        let log = RunLog::start(self.backend.clone(), self.log_index.clone());
        let mut summary = CycleSummary::new(log.run_id(), self.watermark);

        log.info("Checking for new records to process").await;
        log.info(format!(
            "Finding all files in directory: {}",
            self.root.display()
        ))
        .await;

        let mut candidates = match self.discover().await {
            Ok(candidates) => candidates,
            Err(e) => {
                log.error(format!(
                    "Exception - caught when building up a list of files to process: {e}"
                ))
                .await;
                summary.discovery_failed = true;
                Vec::new()
            }
        };
        let snapshot = Utc::now();

        if self.order == FileOrder::OldestFirst {
            candidates.sort_by_key(|candidate| candidate.modified);
        }
        summary.candidates = candidates.len();

        tracing::info!(
            run_id = %log.run_id(),
            candidates = candidates.len(),
            since = %self.watermark.to_rfc3339(),
            "Selected files for ingest"
        );

        let ingest = AssertUnwindSafe(self.ingest(&candidates, &log, &mut summary.files))
            .catch_unwind()
            .await;
        if let Err(panic) = ingest {
            summary.aborted = true;
            log.error(format!(
                "Exception - ingest aborted: {}",
                panic_message(panic.as_ref())
            ))
            .await;
        }

        match self.state.save_watermark(snapshot).await {
            Ok(()) => summary.watermark_saved = true,
            Err(e) => {
                log.error(format!("Exception - unable to store last run time: {e}"))
                    .await;
            }
        }
        self.watermark = snapshot;
        summary.watermark = snapshot;

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        summary
    }

    /// List candidate files newer than the watermark
    async fn discover(&self) -> Result<Vec<CandidateFile>> {
        let source = self.source.clone();
        let root = self.root.clone();
        let files = tokio::task::spawn_blocking(move || source.list_json_files(&root))
            .await
            .map_err(|e| DropshareError::Discovery(format!("Enumeration task failed: {e}")))??;

        Ok(files
            .into_iter()
            .filter(|file| file.modified > self.watermark)
            .collect())
    }

    async fn ingest(
        &self,
        candidates: &[CandidateFile],
        log: &RunLog,
        files: &mut Vec<FileSummary>,
    ) {
        for candidate in candidates {
            files.push(self.process_file(&candidate.path, log).await);
        }
        log.info("All done - Sleeping").await;
    }

    async fn process_file(&self, path: &Path, log: &RunLog) -> FileSummary {
        let mut file_summary = FileSummary::new(path);

        log.info(format!(
            "Generating list of records for file: {}",
            path.display()
        ))
        .await;
        let records = extract_records(path, &self.root, log).await;
        file_summary.records = records.len();
        log.info(format!(
            "Done generating records, preparing to index any records found in: {}",
            path.display()
        ))
        .await;

        for (position, record) in records.iter().enumerate() {
            let outcome = self.writer.write(record, path, position == 0, log).await;
            if outcome.is_success() {
                file_summary.indexed += 1;
                if outcome.is_recovered() {
                    file_summary.recovered += 1;
                }
            } else {
                file_summary.failed += 1;
            }
        }

        log.info(format!(
            "Finished indexing {} records in file: {}",
            file_summary.indexed,
            path.display()
        ))
        .await;
        if file_summary.failed > 0 {
            log.error(format!(
                "Error - unable to index {} records in file: {}",
                file_summary.failed,
                path.display()
            ))
            .await;
        }

        file_summary
    }
}

/// Make sure the audit log index exists, creating it with default analysis
///
/// # Errors
///
/// Returns a backend error if the index cannot be checked or created.
pub async fn ensure_log_index(backend: &dyn SearchBackend, index: &str) -> Result<()> {
    if !backend.index_exists(index).await? {
        backend.create_index(index, IndexAnalysis::Standard).await?;
        tracing::info!(index = %index, "Created log index");
    }
    Ok(())
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
