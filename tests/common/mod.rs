//! Shared test fixtures: an in-memory search backend and drop share helpers

#![allow(dead_code)]

use async_trait::async_trait;
use dropshare::adapters::search::{BackendResult, IndexAnalysis, IndexedDocument, SearchBackend};
use dropshare::domain::BackendError;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime};

/// A document held by [`InMemoryBackend`]
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub index: String,
    pub kind: String,
    pub id: String,
    pub body: Value,
}

#[derive(Default)]
struct State {
    indices: HashMap<String, IndexAnalysis>,
    documents: Vec<StoredDocument>,
    rejected_ids: HashSet<String>,
    rejected_indices: HashSet<String>,
    unreachable: bool,
    next_id: u64,
    existence_checks: HashMap<String, usize>,
}

type WriteHook = Box<dyn FnOnce() + Send>;

/// Search backend keeping everything in memory
///
/// Writes can be made to fail per identifier, per index or entirely, and a
/// write to a chosen index can be made to panic or run a hook.
#[derive(Default)]
pub struct InMemoryBackend {
    state: Mutex<State>,
    panic_on_index: Mutex<Option<String>>,
    after_write: Mutex<Option<(String, WriteHook)>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any write that names this identifier
    pub fn reject_id(&self, id: &str) {
        self.state.lock().unwrap().rejected_ids.insert(id.to_string());
    }

    /// Reject every write to this index
    pub fn reject_index(&self, index: &str) {
        self.state
            .lock()
            .unwrap()
            .rejected_indices
            .insert(index.to_string());
    }

    /// Fail every call as if the cluster were down
    pub fn set_unreachable(&self, unreachable: bool) {
        self.state.lock().unwrap().unreachable = unreachable;
    }

    /// Panic on the next write to this index
    pub fn panic_on_index(&self, index: &str) {
        *self.panic_on_index.lock().unwrap() = Some(index.to_string());
    }

    /// Run `hook` once, right after the first successful write to this index
    pub fn after_first_write(&self, index: &str, hook: impl FnOnce() + Send + 'static) {
        *self.after_write.lock().unwrap() = Some((index.to_string(), Box::new(hook)));
    }

    /// Number of existence checks made against this index
    pub fn existence_checks(&self, index: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .existence_checks
            .get(index)
            .copied()
            .unwrap_or(0)
    }

    /// Insert a document directly
    pub fn seed(&self, index: &str, kind: &str, id: &str, body: Value) {
        let mut state = self.state.lock().unwrap();
        upsert(&mut state, index, kind, id, body);
    }

    pub fn analysis(&self, index: &str) -> Option<IndexAnalysis> {
        self.state.lock().unwrap().indices.get(index).copied()
    }

    pub fn documents_in(&self, index: &str) -> Vec<StoredDocument> {
        self.state
            .lock()
            .unwrap()
            .documents
            .iter()
            .filter(|d| d.index == index)
            .cloned()
            .collect()
    }

    pub fn document(&self, index: &str, id: &str) -> Option<StoredDocument> {
        self.documents_in(index).into_iter().find(|d| d.id == id)
    }

    /// Audit entries written to the `logs` index, in write order
    pub fn audit_entries(&self) -> Vec<StoredDocument> {
        self.documents_in("logs")
            .into_iter()
            .filter(|d| d.kind.starts_with("log_"))
            .collect()
    }

    /// Messages of audit entries with the given severity
    pub fn audit_messages(&self, severity: &str) -> Vec<String> {
        self.audit_entries()
            .into_iter()
            .filter(|d| d.body["msgType"] == severity)
            .filter_map(|d| d.body["message"].as_str().map(str::to_string))
            .collect()
    }

    /// Stored body of the watermark document
    pub fn watermark(&self) -> Option<Value> {
        self.document("logs", "1")
            .filter(|d| d.kind == "lastruntime")
            .map(|d| d.body)
    }
}

fn upsert(state: &mut State, index: &str, kind: &str, id: &str, body: Value) {
    state
        .indices
        .entry(index.to_string())
        .or_insert(IndexAnalysis::Standard);
    state
        .documents
        .retain(|d| !(d.index == index && d.kind == kind && d.id == id));
    state.documents.push(StoredDocument {
        index: index.to_string(),
        kind: kind.to_string(),
        id: id.to_string(),
        body,
    });
}

fn down() -> BackendError {
    BackendError::ConnectionFailed("connection refused".to_string())
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn index_exists(&self, index: &str) -> BackendResult<bool> {
        let mut state = self.state.lock().unwrap();
        *state
            .existence_checks
            .entry(index.to_string())
            .or_default() += 1;
        if state.unreachable {
            return Err(down());
        }
        Ok(state.indices.contains_key(index))
    }

    async fn create_index(&self, index: &str, analysis: IndexAnalysis) -> BackendResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.unreachable {
            return Err(down());
        }
        state.indices.entry(index.to_string()).or_insert(analysis);
        Ok(())
    }

    async fn index_document(
        &self,
        index: &str,
        kind: &str,
        id: Option<&str>,
        body: &str,
    ) -> BackendResult<IndexedDocument> {
        let panic_target = self.panic_on_index.lock().unwrap().clone();
        if panic_target.as_deref() == Some(index) {
            panic!("simulated failure writing to {index}");
        }

        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        if state.unreachable {
            return Err(down());
        }
        if state.rejected_indices.contains(index) {
            return Err(BackendError::Rejected {
                status: 400,
                message: format!("index {index} refuses writes"),
            });
        }
        if let Some(id) = id {
            if state.rejected_ids.contains(id) {
                return Err(BackendError::Rejected {
                    status: 400,
                    message: format!("invalid _id {id}"),
                });
            }
        }

        let body: Value = serde_json::from_str(body).map_err(|e| BackendError::Rejected {
            status: 400,
            message: format!("mapper_parsing_exception: {e}"),
        })?;

        let id = match id {
            Some(id) => id.to_string(),
            None => {
                state.next_id += 1;
                format!("generated-{}", state.next_id)
            }
        };
        upsert(state, index, kind, &id, body);
        drop(guard);

        let hook = {
            let mut pending = self.after_write.lock().unwrap();
            match pending.take() {
                Some((target, hook)) if target == index => Some(hook),
                other => {
                    *pending = other;
                    None
                }
            }
        };
        if let Some(hook) = hook {
            hook();
        }

        Ok(IndexedDocument {
            id,
            result: Some("created".to_string()),
        })
    }

    async fn get_document(
        &self,
        index: &str,
        kind: &str,
        id: &str,
    ) -> BackendResult<Option<Value>> {
        let state = self.state.lock().unwrap();
        if state.unreachable {
            return Err(down());
        }
        Ok(state
            .documents
            .iter()
            .find(|d| d.index == index && d.kind == kind && d.id == id)
            .map(|d| d.body.clone()))
    }

    fn endpoint(&self) -> &str {
        "memory://"
    }
}

/// Write a file below `root` and set its modification time
pub fn drop_file(root: &Path, relative: &str, content: &str, modified: SystemTime) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(modified)
        .unwrap();
    path
}

/// A point in time `secs` seconds ago
pub fn ago(secs: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(secs)
}

/// A point in time `secs` seconds ahead
pub fn ahead(secs: u64) -> SystemTime {
    SystemTime::now() + Duration::from_secs(secs)
}
