//! External system integrations for Dropshare.
//!
//! - [`search`] - Search backend abstraction and the Elasticsearch REST client
//! - [`filesystem`] - Drop share enumeration
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits
//! ([`search::SearchBackend`], [`filesystem::FileSource`]) so the ingest
//! pipeline can be exercised against fakes.
//!
//! ```rust,no_run
//! use dropshare::adapters::search::{ElasticsearchClient, SearchBackend};
//! use dropshare::config::BackendConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ElasticsearchClient::new(&BackendConfig::default())?;
//! let exists = client.index_exists("github").await?;
//! # Ok(())
//! # }
//! ```

pub mod filesystem;
pub mod search;
