//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod parse;
pub mod update_cache;

// Re-export main command functions
pub use parse::{execute_get, execute_parse, validate_parse_args, GetArgs, ParseArgs};
pub use update_cache::{execute_update_cache, UpdateCacheArgs};
