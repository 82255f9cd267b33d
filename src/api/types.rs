//! Response types for the logs.tf match API.
//!
//! The API serves a pre-digested view of the same match the raw log
//! describes. Only a slice of it feeds back into our model: the title,
//! map and coarse total length via [`ApiResponse::apply_to`], and a
//! whole standalone summary via [`ApiResponse::to_summary`] for logs
//! whose raw file is unavailable.

use crate::classifier::decode::{parse_player_class, parse_team, SteamId};
use crate::summary::model::{MatchSummary, Player, RoundSummary};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamStats {
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub kills: i32,
    #[serde(default)]
    pub deaths: i32,
    #[serde(default)]
    pub dmg: i64,
    #[serde(default)]
    pub charges: i32,
    #[serde(default)]
    pub drops: i32,
    #[serde(default)]
    pub firstcaps: i32,
    #[serde(default)]
    pub caps: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiTeams {
    #[serde(rename = "Red", default)]
    pub red: TeamStats,
    #[serde(rename = "Blue", default)]
    pub blue: TeamStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiClassStats {
    #[serde(rename = "type", default)]
    pub class_name: String,
    #[serde(default)]
    pub kills: i32,
    #[serde(default)]
    pub assists: i32,
    #[serde(default)]
    pub deaths: i32,
    #[serde(default)]
    pub dmg: i64,
    #[serde(default)]
    pub total_time: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiPlayer {
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub class_stats: Vec<ApiClassStats>,
    #[serde(default)]
    pub kills: i32,
    #[serde(default)]
    pub deaths: i32,
    #[serde(default)]
    pub assists: i32,
    #[serde(default)]
    pub dmg: i64,
    #[serde(default)]
    pub dmg_real: i64,
    #[serde(default)]
    pub dt: i64,
    #[serde(default, rename = "as")]
    pub airshots: i32,
    #[serde(default)]
    pub ubers: i32,
    #[serde(default)]
    pub drops: i32,
    #[serde(default)]
    pub medkits: i32,
    #[serde(default)]
    pub backstabs: i32,
    #[serde(default)]
    pub headshots: i32,
    #[serde(default)]
    pub heal: i64,
    #[serde(default)]
    pub cpc: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiTeamRound {
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub kills: i32,
    #[serde(default)]
    pub dmg: i64,
    #[serde(default)]
    pub ubers: i32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiRoundTeams {
    #[serde(default)]
    pub red: ApiTeamRound,
    #[serde(default, alias = "blue")]
    pub blu: ApiTeamRound,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiRound {
    #[serde(default)]
    pub start_time: i64,
    #[serde(default)]
    pub winner: String,
    #[serde(default)]
    pub team: ApiRoundTeams,
    #[serde(default)]
    pub firstcap: String,
    #[serde(default)]
    pub length: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiChatMessage {
    #[serde(default)]
    pub steamid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub msg: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiInfo {
    #[serde(default)]
    pub map: String,
    #[serde(default)]
    pub total_length: i64,
    #[serde(default, rename = "hasRealDamage")]
    pub has_real_damage: bool,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub date: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiResponse {
    #[serde(default)]
    pub version: i32,
    #[serde(default)]
    pub teams: ApiTeams,
    #[serde(default)]
    pub length: i64,
    #[serde(default)]
    pub players: HashMap<String, ApiPlayer>,
    #[serde(default)]
    pub names: HashMap<String, String>,
    #[serde(default)]
    pub rounds: Vec<ApiRound>,
    #[serde(default)]
    pub chat: Vec<ApiChatMessage>,
    #[serde(default)]
    pub info: ApiInfo,
    #[serde(default)]
    pub success: bool,
}

impl ApiResponse {
    /// Merge API metadata into an event-derived match. Only the match
    /// title, map and coarse total length are overwritten; everything
    /// the reducer computed stays untouched.
    pub fn apply_to(&self, summary: &mut MatchSummary) {
        summary.match_name = self.info.title.clone();
        summary.map = self.info.map.clone();
        if self.info.total_length > 0 {
            summary.duration = Some(Duration::from_secs(self.info.total_length as u64));
        }
        if self.info.date > 0 {
            summary.created_on = chrono::DateTime::from_timestamp(self.info.date, 0);
        }
    }

    /// Build a coarse standalone summary purely from API data, for logs
    /// whose raw file is unavailable. Positions and timestamps are
    /// zeroed; only counts survive.
    pub fn to_summary(&self) -> MatchSummary {
        let mut summary = MatchSummary::new();
        summary.map = self.info.map.clone();
        summary.match_name = self.info.title.clone();
        if self.info.date > 0 {
            summary.created_on = chrono::DateTime::from_timestamp(self.info.date, 0);
        }
        for (sid3, stats) in &self.players {
            let steam_id = SteamId::parse(sid3);
            if !steam_id.is_valid() {
                continue;
            }
            let mut player = Player::new(steam_id);
            player.team = parse_team(&stats.team);
            if let Some(name) = self.names.get(sid3) {
                player.name = name.clone();
            }
            for _ in 0..stats.kills {
                player.kills.push(Default::default());
            }
            for _ in 0..stats.deaths {
                player.deaths.push(Default::default());
            }
            for cs in &stats.class_stats {
                player.add_class(parse_player_class(&cs.class_name));
            }
            player.assists = stats.assists;
            player.airshots = stats.airshots;
            player.backstabs = stats.backstabs;
            player.headshots = stats.headshots;
            player.damage = if self.info.has_real_damage {
                stats.dmg_real
            } else {
                stats.dmg
            };
            player.captures = stats.cpc;
            player.damage_taken = stats.dt;
            summary.players.insert(steam_id, player);
        }
        for round in &self.rounds {
            summary.rounds.push(RoundSummary {
                winner: parse_team(&round.winner),
                length: Duration::from_secs(round.length.max(0) as u64),
                score_red: round.team.red.score,
                score_blu: round.team.blu.score,
                kills_red: round.team.red.kills,
                kills_blu: round.team.blu.kills,
                ubers_red: round.team.red.ubers,
                ubers_blu: round.team.blu.ubers,
                damage_red: round.team.red.dmg,
                damage_blu: round.team.blu.dmg,
                mid_fight: parse_team(&round.firstcap),
                ..Default::default()
            });
        }
        summary
    }
}
