//! logs.tf acquisition layer: metadata API, raw log downloads and the
//! bulk cache downloader. Nothing in here reaches into the reducer.

pub mod client;
pub mod downloader;
pub mod types;

// Re-export main types and functions
pub use client::{fetch_api, fetch_api_file, fetch_log_file, http_client, latest_log_id};
pub use downloader::{update_cache, Downloader};
pub use types::ApiResponse;
