//! Integration tests for run watermark persistence

mod common;

use chrono::{TimeZone, Utc};
use common::InMemoryBackend;
use dropshare::adapters::search::{IndexAnalysis, SearchBackend};
use dropshare::config::BackendConfig;
use dropshare::core::ingest::ensure_log_index;
use dropshare::core::state::StateManager;
use serde_json::json;
use std::sync::Arc;

fn manager(backend: &Arc<InMemoryBackend>) -> StateManager {
    StateManager::from_config(backend.clone(), &BackendConfig::default())
}

#[tokio::test]
async fn test_absent_watermark() {
    let backend = Arc::new(InMemoryBackend::new());
    assert_eq!(manager(&backend).load_watermark().await.unwrap(), None);

    let before = Utc::now();
    let loaded = manager(&backend).load_or_now().await;
    assert!(loaded >= before);
}

#[tokio::test]
async fn test_save_then_load() {
    let backend = Arc::new(InMemoryBackend::new());
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();

    manager(&backend).save_watermark(at).await.unwrap();

    assert_eq!(
        backend.watermark().unwrap(),
        json!({"lastruntime": "2024-03-01T12:30:00Z"})
    );
    assert_eq!(manager(&backend).load_watermark().await.unwrap(), Some(at));
}

#[tokio::test]
async fn test_naive_timestamp_is_utc() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.seed(
        "logs",
        "lastruntime",
        "1",
        json!({"lastruntime": "2017-05-04T09:15:00.1234567"}),
    );

    let loaded = manager(&backend).load_watermark().await.unwrap().unwrap();
    assert_eq!(
        loaded.format("%Y-%m-%d %H:%M:%S").to_string(),
        "2017-05-04 09:15:00"
    );
}

#[tokio::test]
async fn test_malformed_watermark_falls_back_to_now() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.seed("logs", "lastruntime", "1", json!({"lastruntime": "soon"}));

    assert_eq!(manager(&backend).load_watermark().await.unwrap(), None);

    let before = Utc::now();
    assert!(manager(&backend).load_or_now().await >= before);
}

#[tokio::test]
async fn test_unreachable_backend() {
    let backend = Arc::new(InMemoryBackend::new());
    backend.set_unreachable(true);

    assert!(manager(&backend).load_watermark().await.is_err());
    assert!(manager(&backend).save_watermark(Utc::now()).await.is_err());

    let before = Utc::now();
    assert!(manager(&backend).load_or_now().await >= before);
}

#[tokio::test]
async fn test_ensure_log_index() {
    let backend = Arc::new(InMemoryBackend::new());

    ensure_log_index(backend.as_ref(), "logs").await.unwrap();
    assert_eq!(backend.analysis("logs"), Some(IndexAnalysis::Standard));
    assert!(backend.index_exists("logs").await.unwrap());

    backend.set_unreachable(true);
    assert!(ensure_log_index(backend.as_ref(), "logs").await.is_err());
}
