//! logs.tf Match Stats CLI
//!
//! Parses Team Fortress 2 server logs, merges logs.tf API metadata
//! and prints scoreboard, healing and chat reports.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use logstf_stats::commands::{
    execute_get, execute_parse, execute_update_cache, validate_parse_args, GetArgs, ParseArgs,
    UpdateCacheArgs,
};
use logstf_stats::output::SortBy;

/// logs.tf Match Stats - TF2 log parsing and match reports
#[derive(Parser, Debug)]
#[command(name = "logstf")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a local log file and print match reports
    Parse {
        /// Raw log file (plain text or logs.tf zip)
        #[arg(short, long)]
        file: PathBuf,

        /// Cached logs.tf API response to merge (optional)
        #[arg(short, long)]
        api_json: Option<PathBuf>,

        /// Scoreboard sort attribute
        #[arg(long, value_enum, default_value = "team")]
        sort_by: SortBy,

        /// Print the chat transcript after the reports
        #[arg(long)]
        chat: bool,
    },

    /// Load a log by id from the cache and print match reports
    Get {
        /// logs.tf log id
        #[arg(short, long)]
        id: i64,

        /// Cache directory
        #[arg(short, long, default_value = "cache")]
        cache_dir: PathBuf,

        /// Scoreboard sort attribute
        #[arg(long, value_enum, default_value = "team")]
        sort_by: SortBy,

        /// Print the chat transcript after the reports
        #[arg(long)]
        chat: bool,
    },

    /// Download recent logs and API responses into the cache
    UpdateCache {
        /// Cache directory
        #[arg(short, long, default_value = "cache")]
        cache_dir: PathBuf,

        /// How many recent log ids to fetch, counting back from the newest
        #[arg(short, long, default_value = "1000")]
        lookback: i64,

        /// Number of download workers
        #[arg(short, long, default_value = "4")]
        workers: usize,
    },
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Parse {
            file,
            api_json,
            sort_by,
            chat,
        } => {
            let args = ParseArgs {
                file,
                api_json,
                sort_by,
                show_chat: chat,
            };

            // Validate args first
            validate_parse_args(&args)?;

            execute_parse(args)?;
        }

        Commands::Get {
            id,
            cache_dir,
            sort_by,
            chat,
        } => {
            execute_get(GetArgs {
                log_id: id,
                cache_dir,
                sort_by,
                show_chat: chat,
            })?;
        }

        Commands::UpdateCache {
            cache_dir,
            lookback,
            workers,
        } => {
            execute_update_cache(UpdateCacheArgs {
                cache_dir,
                lookback,
                workers,
            })?;
        }
    }

    Ok(())
}
