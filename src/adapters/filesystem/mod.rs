//! Drop share access
//!
//! The coordinator discovers work through [`FileSource`]; [`LocalDropShare`]
//! walks a local or mounted directory tree.

pub mod local;

pub use local::LocalDropShare;

use crate::domain::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// A JSON file found in the drop share
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    /// Full path to the file
    pub path: PathBuf,

    /// Last modification time, normalized to UTC
    pub modified: DateTime<Utc>,
}

/// Read-only listing of the drop share
pub trait FileSource: Send + Sync {
    /// List every `*.json` file below `root`, recursively
    ///
    /// # Errors
    ///
    /// Returns a discovery error if the root itself cannot be enumerated.
    fn list_json_files(&self, root: &Path) -> Result<Vec<CandidateFile>>;
}
