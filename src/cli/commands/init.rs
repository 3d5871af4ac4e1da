//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "dropshare.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("Initializing Dropshare configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your drop share and cluster", self.output);
                println!("  2. Put credentials in a .env file:");
                println!("     - Set DROPSHARE_BACKEND_PASSWORD if the cluster needs auth");
                println!("  3. Validate configuration: dropshare validate-config");
                println!("  4. Start importing: dropshare run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Dropshare Configuration File
# JSON drop folder to Elasticsearch importer

[application]
log_level = "info"

[dropshare]
root = "/mnt/dropshare"

[backend]
url = "http://localhost:9200"

[schedule]
sleep_interval_minutes = 5

[logging]
local_enabled = true
local_path = "/var/log/dropshare"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# ============================================================================
# Dropshare Configuration File
# ============================================================================
# Producers drop files of whitespace-separated JSON objects into
#   <root>/<index>/<type>.json
# and Dropshare imports every file modified since its last run.
#
# Values like "${NAME}" are replaced with environment variables, and any
# setting can be overridden with DROPSHARE_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

# ============================================================================
# Drop Share
# ============================================================================
[dropshare]
# Directory watched for JSON files (local path or mounted share)
root = "/mnt/dropshare"

# Processing order within a cycle:
# - enumeration: the order the filesystem lists files in
# - oldest_first: ascending modification time
order = "enumeration"

# ============================================================================
# Elasticsearch Backend
# ============================================================================
[backend]
# Cluster base URL
url = "http://localhost:9200"

# Optional basic authentication (use environment variables)
# username = "elastic"
# password = "${DROPSHARE_BACKEND_PASSWORD}"

# Per-request timeout in seconds
timeout_seconds = 60

# true:  /{index}/{type} endpoints (clusters with mapping types)
# false: /{index}/_doc endpoints (typeless clusters)
mapping_types = true

# Index receiving the audit log and the run watermark
log_index = "logs"

# Location of the run watermark document inside log_index
watermark_kind = "lastruntime"
watermark_id = "1"

# ============================================================================
# Scheduling
# ============================================================================
[schedule]
# Minutes to sleep between cycles (1-1440)
sleep_interval_minutes = 5

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# JSON log files in addition to the console
local_enabled = true
local_path = "/var/log/dropshare"

# Rotation: daily or hourly
local_rotation = "daily"
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DropshareConfig;
    use tempfile::TempDir;

    #[test]
    fn test_generated_configs_parse_and_validate() {
        for content in [
            InitArgs::generate_minimal_config(),
            InitArgs::generate_config_with_examples(),
        ] {
            let config: DropshareConfig = toml::from_str(&content).unwrap();
            config.validate().unwrap();
            assert_eq!(config.backend.log_index, "logs");
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("dropshare.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), 2);
        assert_eq!(fs::read_to_string(&output).unwrap(), "existing");
    }

    #[tokio::test]
    async fn test_init_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("dropshare.toml");
        fs::write(&output, "existing").unwrap();

        let args = InitArgs {
            output: output.to_string_lossy().to_string(),
            with_examples: true,
            force: true,
        };
        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(fs::read_to_string(&output)
            .unwrap()
            .contains("[backend]"));
    }
}
