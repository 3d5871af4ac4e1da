// Dropshare - JSON drop folder to Elasticsearch importer
// Copyright (c) 2025 Dropshare Contributors
// Licensed under the MIT License

//! # Dropshare - JSON drop folder to Elasticsearch importer
//!
//! Dropshare watches a directory tree that other systems drop JSON files
//! into and imports every new or modified file into Elasticsearch on a
//! fixed interval.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Discovering** `*.json` files modified since the last run
//! - **Extracting** whitespace-separated JSON objects, routed by path
//! - **Indexing** each object, recovering once from a rejected `_id`
//! - **Tracking** progress with a run watermark and a per-run audit log
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (ingest, audit, state, scheduling)
//! - [`adapters`] - External integrations (filesystem, Elasticsearch)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Routing
//!
//! A file's first directory below the drop share root names the index and
//! its base name, with every extension removed, names the document type:
//!
//! ```text
//! /mnt/dropshare/Github/MyDataFile.2024.json  ->  index "github", type "mydatafile"
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dropshare::config::load_config;
//! use dropshare::core::ingest::IngestCoordinator;
//! use dropshare::core::schedule::Scheduler;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("dropshare.toml")?;
//!     let mut coordinator = IngestCoordinator::from_config(&config).await?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let mut scheduler = Scheduler::from_config(&config.schedule, shutdown_rx);
//!     scheduler.run(&mut coordinator).await;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], backed by
//! [`domain::DropshareError`]. Inside a cycle, errors are handled per file
//! or per record and only show up in the audit log and the returned
//! [`core::ingest::CycleSummary`].

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
