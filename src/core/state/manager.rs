//! State manager for watermark persistence
//!
//! Loads and saves the run watermark through the search backend.

use crate::adapters::search::SearchBackend;
use crate::config::BackendConfig;
use crate::core::state::watermark::WatermarkDocument;
use crate::domain::{DropshareError, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// State manager for watermark persistence
///
/// The watermark is stored at `{index}/{kind}/{id}`, by default
/// `logs/lastruntime/1`.
pub struct StateManager {
    backend: Arc<dyn SearchBackend>,
    index: String,
    kind: String,
    id: String,
}

impl StateManager {
    /// Create a state manager storing the watermark at an explicit location
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        index: impl Into<String>,
        kind: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            backend,
            index: index.into(),
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create a state manager using the location named in the backend config
    pub fn from_config(backend: Arc<dyn SearchBackend>, config: &BackendConfig) -> Self {
        Self::new(
            backend,
            config.log_index.clone(),
            config.watermark_kind.clone(),
            config.watermark_id.clone(),
        )
    }

    /// Load the stored watermark
    ///
    /// Returns `Ok(None)` if no watermark document exists or its timestamp
    /// cannot be read.
    ///
    /// # Errors
    ///
    /// Returns a state error if the backend cannot be queried.
    pub async fn load_watermark(&self) -> Result<Option<DateTime<Utc>>> {
        let source = self
            .backend
            .get_document(&self.index, &self.kind, &self.id)
            .await
            .map_err(|e| DropshareError::State(format!("Failed to read watermark: {e}")))?;

        let Some(source) = source else {
            return Ok(None);
        };

        let watermark = WatermarkDocument::from_source(&source);
        if watermark.is_none() {
            tracing::warn!(
                index = %self.index,
                document = %source,
                "Stored watermark is malformed"
            );
        }
        Ok(watermark)
    }

    /// Load the stored watermark, falling back to the current time
    ///
    /// Starting from "now" means files already present in the drop share on
    /// first startup are not imported until they are modified again.
    pub async fn load_or_now(&self) -> DateTime<Utc> {
        match self.load_watermark().await {
            Ok(Some(watermark)) => {
                tracing::info!(watermark = %watermark.to_rfc3339(), "Loaded run watermark");
                watermark
            }
            Ok(None) => {
                let now = Utc::now();
                tracing::info!(watermark = %now.to_rfc3339(), "No run watermark stored, starting from now");
                now
            }
            Err(e) => {
                let now = Utc::now();
                tracing::warn!(error = %e, watermark = %now.to_rfc3339(), "Starting from now");
                now
            }
        }
    }

    /// Save a watermark, replacing the stored one
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be serialized or the backend
    /// rejects the write.
    pub async fn save_watermark(&self, watermark: DateTime<Utc>) -> Result<()> {
        let body = serde_json::to_string(&WatermarkDocument::new(watermark))?;

        self.backend
            .index_document(&self.index, &self.kind, Some(&self.id), &body)
            .await
            .map_err(|e| DropshareError::State(format!("Failed to save watermark: {e}")))?;

        tracing::debug!(watermark = %watermark.to_rfc3339(), "Saved run watermark");
        Ok(())
    }
}
