//! Cache refresh command.

use crate::api;
use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Arguments for the update-cache command
#[derive(Debug, Clone)]
pub struct UpdateCacheArgs {
    pub cache_dir: PathBuf,
    /// How many recent log ids to walk back from the newest
    pub lookback: i64,
    pub workers: usize,
}

/// Execute the update-cache command.
pub fn execute_update_cache(args: UpdateCacheArgs) -> Result<()> {
    info!(
        "Updating cache at {} (lookback {}, {} workers)",
        args.cache_dir.display(),
        args.lookback,
        args.workers
    );
    let (successes, failures) = api::update_cache(&args.cache_dir, args.lookback, args.workers)
        .context("Cache update failed")?;
    info!("Cache update done: {} fetched, {} failed", successes, failures);
    Ok(())
}
