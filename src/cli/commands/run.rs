//! Run command implementation
//!
//! This module implements the `run` command, which watches the drop share
//! and imports new or modified files into the search backend.

use crate::config::load_config;
use crate::core::ingest::{CycleSummary, IngestCoordinator};
use crate::core::schedule::Scheduler;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run a single cycle and exit instead of looping
    #[arg(long)]
    pub once: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(once = self.once, "Starting run command");

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        tracing::info!("Creating ingest coordinator");
        let mut coordinator = match IngestCoordinator::from_config(&config).await {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create ingest coordinator");
                eprintln!("Failed to initialize ingest: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        if self.once {
            let summary = coordinator.run_once().await;
            print_summary(&summary);
            return Ok(if summary.is_successful() { 0 } else { 1 });
        }

        println!(
            "Watching {} every {} minute(s). Press Ctrl+C to stop.",
            config.dropshare.root.display(),
            config.schedule.sleep_interval_minutes
        );

        let mut scheduler = Scheduler::from_config(&config.schedule, shutdown_signal);
        let cycles = scheduler.run(&mut coordinator).await;

        println!();
        println!("Stopped after {cycles} cycle(s).");
        println!(
            "Last run time: {}",
            coordinator.watermark().format("%Y-%m-%d %H:%M:%S UTC")
        );
        Ok(0)
    }
}

fn print_summary(summary: &CycleSummary) {
    println!();
    println!("Cycle Summary:");
    println!("  Run ID: {}", summary.run_id);
    println!("  Candidate Files: {}", summary.candidates);
    println!("  Files Without Records: {}", summary.empty_files());
    println!("  Records: {}", summary.total_records());
    println!("  Indexed: {}", summary.total_indexed());
    println!("  Recovered (_id -> old_id): {}", summary.total_recovered());
    println!("  Failed: {}", summary.total_failed());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!(
        "  Watermark: {}{}",
        summary.watermark.format("%Y-%m-%d %H:%M:%S UTC"),
        if summary.watermark_saved {
            ""
        } else {
            " (not saved)"
        }
    );
    println!();

    if summary.discovery_failed {
        println!("Listing the drop share failed; see the run log for details.");
    }
    if summary.aborted {
        println!("The ingest phase was aborted; see the run log for details.");
    }
    for file in summary.files.iter().filter(|f| f.failed > 0) {
        println!("  - {}: {} record(s) failed", file.path.display(), file.failed);
    }
}
