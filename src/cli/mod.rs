//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Dropshare using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Dropshare - JSON drop folder to Elasticsearch importer
#[derive(Parser, Debug)]
#[command(name = "dropshare")]
#[command(version, about, long_about = None)]
#[command(author = "Dropshare Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "dropshare.toml", env = "DROPSHARE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DROPSHARE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Watch the drop share and import new files into the backend
    Run(commands::run::RunArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Show the stored run watermark and pending files
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
