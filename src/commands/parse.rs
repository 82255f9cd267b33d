//! Parse and get command implementations.
//!
//! Both commands reduce a raw log to a match summary and print the
//! scoreboard, healing breakdown and optionally the chat transcript;
//! `get` additionally resolves the input through the on-disk cache and
//! merges the API metadata.

use crate::classifier::rules::RuleSet;
use crate::ingest::{load_match, read_api_json, read_log_file};
use crate::output::{chat_report, healing_report, players_table, SortBy};
use crate::summary::model::MatchSummary;
use anyhow::{Context, Result};
use log::info;
use std::path::{Path, PathBuf};

/// Arguments for the parse command
#[derive(Debug, Clone)]
pub struct ParseArgs {
    /// Raw log file, plain text or zip
    pub file: PathBuf,
    /// Optional cached API metadata to merge
    pub api_json: Option<PathBuf>,
    pub sort_by: SortBy,
    pub show_chat: bool,
}

/// Execute the parse command against a local file.
pub fn execute_parse(args: ParseArgs) -> Result<()> {
    let rules = RuleSet::new();
    info!("Parsing log: {}", args.file.display());
    let mut summary = read_log_file(&rules, &args.file)
        .with_context(|| format!("Failed to read log {}", args.file.display()))?;
    if let Some(api_path) = &args.api_json {
        let api = read_api_json(api_path)
            .with_context(|| format!("Failed to read api json {}", api_path.display()))?;
        api.apply_to(&mut summary);
    }
    print_reports(&summary, args.sort_by, args.show_chat);
    Ok(())
}

/// Arguments for the get command
#[derive(Debug, Clone)]
pub struct GetArgs {
    pub log_id: i64,
    pub cache_dir: PathBuf,
    pub sort_by: SortBy,
    pub show_chat: bool,
}

/// Execute the get command against the cache.
pub fn execute_get(args: GetArgs) -> Result<()> {
    let rules = RuleSet::new();
    let summary = load_match(&rules, &args.cache_dir, args.log_id)
        .with_context(|| format!("Failed to load match {}", args.log_id))?;
    print_reports(&summary, args.sort_by, args.show_chat);
    Ok(())
}

fn print_reports(summary: &MatchSummary, sort_by: SortBy, show_chat: bool) {
    print!("{}", players_table(summary, sort_by));
    let healing = healing_report(summary);
    if !healing.is_empty() {
        println!("{}", healing);
    }
    if show_chat {
        print!("{}", chat_report(summary));
    }
}

/// Reject obviously bad arguments before doing any work.
pub fn validate_parse_args(args: &ParseArgs) -> Result<()> {
    validate_input_file(&args.file)?;
    if let Some(api_path) = &args.api_json {
        validate_input_file(api_path)?;
    }
    Ok(())
}

fn validate_input_file(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("Input file does not exist: {}", path.display());
    }
    if !path.is_file() {
        anyhow::bail!("Input path is not a file: {}", path.display());
    }
    Ok(())
}
