//! Run watermark persistence
//!
//! The watermark is the UTC instant below which drop share files count as
//! processed. It lives as a single well-known document in the log index.

pub mod manager;
pub mod watermark;

pub use manager::StateManager;
pub use watermark::{parse_timestamp, WatermarkDocument};
