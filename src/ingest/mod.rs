//! Ingestion driver: turns raw log inputs into reduced match state.
//!
//! Inputs are finite, ordered and complete: a plain text log file or
//! the first entry of a zip archive, fed to the reducer one line at a
//! time in file order. A single malformed line never aborts ingestion;
//! an unreadable or empty archive always does.

use crate::api::types::ApiResponse;
use crate::classifier::rules::RuleSet;
use crate::summary::model::MatchSummary;
use crate::utils::config::{CACHE_BUCKET_MIN, CACHE_BUCKET_SIZE};
use crate::utils::error::IngestError;
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

/// Cached artifact flavours for one log id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Zip,
    Json,
}

impl FileFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Zip => "zip",
            FileFormat::Json => "json",
        }
    }
}

/// Cache-relative path for one log id: ids are bucketed into
/// directories of 1000 consecutive ids, with everything below 10000 in
/// bucket "0".
pub fn cache_file(log_id: i64, format: FileFormat) -> PathBuf {
    let bucket = if log_id >= CACHE_BUCKET_MIN {
        (log_id / CACHE_BUCKET_SIZE) * CACHE_BUCKET_SIZE
    } else {
        0
    };
    PathBuf::from(bucket.to_string()).join(format!("logs_{}.{}", log_id, format.extension()))
}

/// Read and reduce a raw match log. Accepts a plain text file or a zip
/// archive whose first entry is the log.
pub fn read_log_file(rules: &RuleSet, path: &Path) -> Result<MatchSummary, IngestError> {
    let mut summary = MatchSummary::new();
    let is_zip = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false);
    if is_zip {
        let file = File::open(path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        if archive.is_empty() {
            return Err(IngestError::EmptyArchive);
        }
        let mut entry = archive.by_index(0)?;
        let mut raw = Vec::new();
        entry.read_to_end(&mut raw)?;
        let content = String::from_utf8(raw)?;
        for line in content.split('\n') {
            summary.apply_line(rules, line);
        }
    } else {
        let file = File::open(path)?;
        for line in BufReader::new(file).lines() {
            summary.apply_line(rules, &line?);
        }
    }
    debug!(
        "Reduced {}: {} players, {} rounds",
        path.display(),
        summary.players.len(),
        summary.rounds.len()
    );
    Ok(summary)
}

/// Read a cached API metadata document from disk.
pub fn read_api_json(path: &Path) -> Result<ApiResponse, crate::utils::error::ApiError> {
    let raw = std::fs::read(path)?;
    let response: ApiResponse = serde_json::from_slice(&raw)?;
    Ok(response)
}

/// Load one match from the cache. The raw log is preferred; when only
/// the API document is cached, a coarse API-derived summary is built
/// instead. The metadata merge onto a reduced log is best-effort.
pub fn load_match(
    rules: &RuleSet,
    cache_dir: &Path,
    log_id: i64,
) -> Result<MatchSummary, IngestError> {
    let raw_path = cache_dir.join(cache_file(log_id, FileFormat::Zip));
    let api_path = cache_dir.join(cache_file(log_id, FileFormat::Json));
    let mut summary = match read_log_file(rules, &raw_path) {
        Ok(summary) => summary,
        Err(err) => {
            let api = read_api_json(&api_path).map_err(|_| err)?;
            log::warn!("No raw log for {}, using api summary", log_id);
            let mut summary = api.to_summary();
            summary.id = log_id;
            return Ok(summary);
        }
    };
    summary.id = log_id;
    match read_api_json(&api_path) {
        Ok(api) => api.apply_to(&mut summary),
        Err(err) => log::warn!("Failed to read api response for {}: {}", log_id, err),
    }
    Ok(summary)
}
