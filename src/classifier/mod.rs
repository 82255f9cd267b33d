//! Log line classification and field decoding.
//!
//! This module handles:
//! - The ordered pattern rule table (first-match-wins)
//! - Decoding captured fields into typed values
//! - The tagged event type consumed by the reducer

pub mod decode;
pub mod event;
pub mod rules;

// Re-export main types
pub use decode::{
    parse_datetime, parse_health_pack, parse_medigun, parse_params, parse_player_class, parse_pos,
    parse_team, HealthPack, Medigun, PlayerClass, Position, SteamId, Team,
};
pub use event::{Event, EventKind, Parsed, PlayerRef};
pub use rules::{FieldMap, LineKind, RuleSet};
