//! Match state aggregation.
//!
//! This module holds:
//! - The in-memory match model (players, teams, rounds, chat)
//! - The reducer that folds classified events into it

pub mod model;
pub mod reducer;

// Re-export main types
pub use model::{
    ClassStats, HealingSummary, Kill, MatchSummary, Message, Player, RoundSummary, TeamSummary,
};
