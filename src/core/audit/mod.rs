//! Per-run audit trail
//!
//! Every cycle gets its own [`RunLog`]. Messages go to `tracing` and are
//! indexed into the backend's log index under the type `log_<run id>`, so
//! each run can be read back as one group.

pub mod logger;

pub use logger::{AuditEntry, RunLog, Severity};
