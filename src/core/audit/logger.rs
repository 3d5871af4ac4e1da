//! Run log writing audit entries to the search backend

use crate::adapters::search::SearchBackend;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Severity of an audit message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Information,
    Error,
}

/// Audit document as stored in the log index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub message: String,
    pub msg_type: Severity,
    pub time_stamp: DateTime<Utc>,
    pub run_id: String,
}

/// Audit sink for one ingest cycle
///
/// Writing an entry never fails from the caller's point of view: a backend
/// error is reported through `tracing` and otherwise ignored.
#[derive(Clone)]
pub struct RunLog {
    run_id: String,
    index: String,
    backend: Arc<dyn SearchBackend>,
}

impl RunLog {
    /// Open a log for a new run with a freshly generated run id
    pub fn start(backend: Arc<dyn SearchBackend>, index: impl Into<String>) -> Self {
        Self::with_run_id(backend, index, Uuid::new_v4().simple().to_string())
    }

    /// Open a log for a known run id
    pub fn with_run_id(
        backend: Arc<dyn SearchBackend>,
        index: impl Into<String>,
        run_id: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            index: index.into(),
            backend,
        }
    }

    /// Identifier of this run
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Document type the run's entries are grouped under
    pub fn kind(&self) -> String {
        format!("log_{}", self.run_id)
    }

    /// Record an Information message
    pub async fn info(&self, message: impl Into<String>) {
        self.log(Severity::Information, message.into()).await;
    }

    /// Record an Error message
    pub async fn error(&self, message: impl Into<String>) {
        self.log(Severity::Error, message.into()).await;
    }

    async fn log(&self, severity: Severity, message: String) {
        match severity {
            Severity::Information => tracing::info!(run_id = %self.run_id, "{message}"),
            Severity::Error => tracing::error!(run_id = %self.run_id, "{message}"),
        }

        let entry = AuditEntry {
            message,
            msg_type: severity,
            time_stamp: Utc::now(),
            run_id: self.run_id.clone(),
        };

        let body = match serde_json::to_string(&entry) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize audit entry");
                return;
            }
        };

        if let Err(e) = self
            .backend
            .index_document(&self.index, &self.kind(), None, &body)
            .await
        {
            tracing::warn!(
                run_id = %self.run_id,
                index = %self.index,
                error = %e,
                "Failed to write audit entry"
            );
        }
    }
}
