//! Text report rendering over reduced match state.

pub mod report;
pub mod table;

// Re-export main functions
pub use report::{chat_report, healing_report, players_table, SortBy};
pub use table::{to_table, TableOpts};
