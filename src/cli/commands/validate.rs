//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Dropshare configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Drop Share: {}", config.dropshare.root.display());
        println!("  File Order: {:?}", config.dropshare.order);
        println!("  Backend URL: {}", config.backend.url);
        println!(
            "  Backend Auth: {}",
            match (&config.backend.username, &config.backend.password) {
                (Some(user), Some(_)) => format!("basic ({user})"),
                (Some(user), None) => format!("basic ({user}, no password)"),
                _ => "none".to_string(),
            }
        );
        println!("  Request Timeout: {}s", config.backend.timeout_seconds);
        println!("  Mapping Types: {}", config.backend.mapping_types);
        println!("  Log Index: {}", config.backend.log_index);
        println!(
            "  Sleep Interval: {} minute(s)",
            config.schedule.sleep_interval_minutes
        );
        println!();

        if !config.dropshare.root.is_dir() {
            println!(
                "Warning: drop share {} is not currently reachable",
                config.dropshare.root.display()
            );
            println!();
        }

        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_valid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[dropshare]\nroot = \"/tmp\"\n\n[backend]\nurl = \"http://localhost:9200\""
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_invalid_config() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[dropshare]\nroot = \"/tmp\"\n\n[backend]\nurl = \"ftp://localhost\""
        )
        .unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 2);
    }
}
