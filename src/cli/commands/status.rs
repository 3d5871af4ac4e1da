//! Status command implementation
//!
//! This module implements the `status` command for displaying the stored
//! run watermark and the files the next cycle would pick up.

use crate::adapters::filesystem::{FileSource, LocalDropShare};
use crate::adapters::search::{ElasticsearchClient, SearchBackend};
use crate::config::load_config;
use crate::core::state::StateManager;
use clap::Args;
use std::sync::Arc;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// List every pending file instead of only counting them
    #[arg(long)]
    pub list: bool,
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking ingest status");

        println!("Ingest Status");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        let backend: Arc<dyn SearchBackend> = match ElasticsearchClient::new(&config.backend) {
            Ok(c) => Arc::new(c),
            Err(e) => {
                println!("Failed to create backend client");
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let state_manager = StateManager::from_config(backend.clone(), &config.backend);
        let watermark = match state_manager.load_watermark().await {
            Ok(w) => w,
            Err(e) => {
                println!("Failed to read the run watermark from {}", backend.endpoint());
                println!("   Error: {e}");
                return Ok(4); // Connection error exit code
            }
        };

        let Some(watermark) = watermark else {
            println!("No run watermark stored.");
            println!("The first cycle will only pick up files modified after it starts.");
            return Ok(0);
        };

        println!(
            "Last run time: {}",
            watermark.format("%Y-%m-%d %H:%M:%S UTC")
        );

        let files = match LocalDropShare::new().list_json_files(&config.dropshare.root) {
            Ok(files) => files,
            Err(e) => {
                println!("Failed to list the drop share");
                println!("   Error: {e}");
                return Ok(5); // Fatal error exit code
            }
        };

        let pending: Vec<_> = files
            .into_iter()
            .filter(|f| f.modified > watermark)
            .collect();
        println!("Pending files: {}", pending.len());

        if self.list {
            println!();
            for file in &pending {
                println!(
                    "  {}  {}",
                    file.modified.format("%Y-%m-%d %H:%M:%S"),
                    file.path.display()
                );
            }
        }

        println!();
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_args_defaults() {
        let args = StatusArgs { list: false };
        assert!(!args.list);
    }

    #[tokio::test]
    async fn test_missing_config() {
        let code = StatusArgs { list: false }
            .execute("/nonexistent/dropshare.toml")
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
