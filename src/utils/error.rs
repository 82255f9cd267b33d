//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use thiserror::Error;

/// Errors that can occur while reading a raw match log
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open zip archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("No files found in zip archive")]
    EmptyArchive,

    #[error("Log file is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Errors that can occur while talking to the logs.tf API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Got non-successful API response for log {0}")]
    Unsuccessful(i64),

    #[error("Log not found")]
    NotFound,

    #[error("Rate limited by remote server")]
    TooManyRequests,

    #[error("Unexpected HTTP status: {0}")]
    BadStatus(u16),
}
