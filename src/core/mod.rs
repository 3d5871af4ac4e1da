//! Core business logic for Dropshare.
//!
//! # Modules
//!
//! - [`ingest`] - Record extraction, index writing and cycle coordination
//! - [`audit`] - Per-run audit log written to the backend
//! - [`state`] - Run watermark persistence
//! - [`schedule`] - Sleep-and-repeat loop with graceful shutdown
//!
//! # Ingest Workflow
//!
//! One cycle:
//!
//! 1. **Discover**: List `*.json` files under the drop share modified after the watermark
//! 2. **Snapshot**: Take "now" as the next watermark
//! 3. **Extract**: Parse each file into records routed by its path
//! 4. **Write**: Index each record, recovering once from a rejected `_id`
//! 5. **Checkpoint**: Persist the snapshot, even if the ingest phase failed
//! 6. **Report**: Return a cycle summary
//!
//! # Example
//!
//! ```rust,no_run
//! use dropshare::config::load_config;
//! use dropshare::core::ingest::IngestCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("dropshare.toml")?;
//! let mut coordinator = IngestCoordinator::from_config(&config).await?;
//!
//! let summary = coordinator.run_once().await;
//! println!("Indexed: {}", summary.total_indexed());
//! println!("Failed: {}", summary.total_failed());
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod ingest;
pub mod schedule;
pub mod state;
