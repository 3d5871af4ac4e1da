//! Cycle scheduling
//!
//! The [`Scheduler`] runs ingest cycles back to back with a fixed sleep in
//! between until the shutdown signal is raised. A cycle that has started is
//! always allowed to finish; the signal is only observed before a cycle and
//! while sleeping.

use crate::config::ScheduleConfig;
use crate::core::ingest::IngestCoordinator;
use std::time::Duration;
use tokio::sync::watch;

/// Sleep-and-repeat control loop
pub struct Scheduler {
    interval: Duration,
    shutdown: watch::Receiver<bool>,
    signal_open: bool,
}

impl Scheduler {
    /// Create a scheduler sleeping `interval` between cycles
    pub fn new(interval: Duration, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            interval,
            shutdown,
            signal_open: true,
        }
    }

    /// Create a scheduler from the `[schedule]` section
    pub fn from_config(config: &ScheduleConfig, shutdown: watch::Receiver<bool>) -> Self {
        Self::new(config.interval(), shutdown)
    }

    /// Interval between the end of one cycle and the start of the next
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether shutdown has been requested
    pub fn is_shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Run cycles until shutdown is requested
    ///
    /// Returns the number of cycles completed.
    pub async fn run(&mut self, coordinator: &mut IngestCoordinator) -> usize {
        let mut cycles = 0;

        tracing::info!(
            interval_secs = self.interval.as_secs(),
            root = %coordinator.root().display(),
            "Scheduler started"
        );

        loop {
            if self.is_shutdown_requested() {
                break;
            }

            let summary = coordinator.run_once().await;
            cycles += 1;
            tracing::debug!(
                cycle = cycles,
                run_id = %summary.run_id,
                "Cycle finished, sleeping"
            );

            if !self.sleep().await {
                break;
            }
        }

        tracing::info!(cycles = cycles, "Scheduler stopped");
        cycles
    }

    /// Sleep for one interval; returns `false` if shutdown was requested
    async fn sleep(&mut self) -> bool {
        if !self.signal_open {
            tokio::time::sleep(self.interval).await;
            return true;
        }

        tokio::select! {
            _ = tokio::time::sleep(self.interval) => true,
            changed = self.shutdown.changed() => match changed {
                Ok(()) => !*self.shutdown.borrow(),
                Err(_) => {
                    tracing::debug!("Shutdown sender dropped, continuing on timer only");
                    self.signal_open = false;
                    tokio::time::sleep(self.interval).await;
                    true
                }
            },
        }
    }
}
