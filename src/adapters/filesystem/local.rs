//! Local drop share walker

use super::{CandidateFile, FileSource};
use crate::domain::{DropshareError, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use walkdir::WalkDir;

/// Extension (case-insensitive) of files picked up from the drop share
const JSON_EXTENSION: &str = "json";

/// [`FileSource`] backed by the local filesystem
///
/// Symlinks are not followed. Entries below the root that cannot be read
/// are skipped with a warning; failure to read the root itself is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalDropShare;

impl LocalDropShare {
    /// Create a new walker
    pub fn new() -> Self {
        Self
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case(JSON_EXTENSION))
        .unwrap_or(false)
}

impl FileSource for LocalDropShare {
    fn list_json_files(&self, root: &Path) -> Result<Vec<CandidateFile>> {
        if !root.is_dir() {
            return Err(DropshareError::Discovery(format!(
                "Drop share root {} is not a readable directory",
                root.display()
            )));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(DropshareError::Discovery(format!(
                        "Failed to enumerate {}: {e}",
                        root.display()
                    )));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable drop share entry");
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_json(entry.path()) {
                continue;
            }

            let modified = entry
                .metadata()
                .map_err(std::io::Error::from)
                .and_then(|metadata| metadata.modified());

            match modified {
                Ok(modified) => files.push(CandidateFile {
                    path: entry.into_path(),
                    modified: DateTime::<Utc>::from(modified),
                }),
                Err(e) => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "Skipping file without a modification time"
                    );
                }
            }
        }

        tracing::debug!(root = %root.display(), count = files.len(), "Enumerated drop share");
        Ok(files)
    }
}
