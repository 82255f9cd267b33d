//! logs.tf Match Stats
//!
//! Parsing and aggregation of Team Fortress 2 server logs as
//! published on logs.tf.
//!
//! This crate provides the core implementation for the
//! `logstf` CLI tool: a line classifier for the TF2 log grammar,
//! a reducer that folds classified events into per-player and
//! per-team match summaries, an ingestion layer for local files
//! and the on-disk cache, a logs.tf API client with a bulk
//! downloader, and plain-text scoreboard reports.
//!
//! ## Getting Started
//!
//! Most users should install and use the CLI:
//!
//! ```bash
//! cargo install logstf-stats
//! logstf --help
//! ```

pub mod api;
pub mod classifier;
pub mod commands;
pub mod ingest;
pub mod output;
pub mod summary;
pub mod utils;
