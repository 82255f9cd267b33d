//! In-memory match model: the root aggregate and everything it owns.
//!
//! A [`MatchSummary`] is created empty, mutated one line at a time by
//! the reducer in strict arrival order, and treated as immutable once
//! the line stream is exhausted.

use crate::classifier::decode::{Medigun, PlayerClass, Position, SteamId, Team};
use chrono::{DateTime, TimeDelta, Utc};
use std::collections::HashMap;
use std::time::Duration;

/// One kill as recorded on both sides of the exchange: the attacker's
/// kill list and the victim's death list each get a record, with
/// `other` naming the opposing party (or the actor itself for
/// suicides).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kill {
    pub attacker_pos: Position,
    pub victim_pos: Position,
    pub other: SteamId,
    pub created_on: DateTime<Utc>,
}

impl Default for Kill {
    fn default() -> Self {
        Kill {
            attacker_pos: Position::default(),
            victim_pos: Position::default(),
            other: SteamId::INVALID,
            created_on: DateTime::<Utc>::MIN_UTC,
        }
    }
}

/// Lightweight per-class counters accumulated while the class is the
/// player's current one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassStats {
    pub kills: i32,
    pub assists: i32,
    pub deaths: i32,
    pub damage: i64,
}

/// Healing bookkeeping attached to a player the first time they are
/// seen playing medic.
#[derive(Debug, Clone, Default)]
pub struct HealingSummary {
    pub healing: i64,
    pub charges: HashMap<Medigun, i32>,
    pub charge_lengths: Vec<f64>,
    pub drops: i32,
    pub near_full_charge_deaths: i32,
    pub major_advantages_lost: i32,
    /// Cumulative healing per target, keyed by identity; the match owns
    /// all players, so no references are held here.
    pub targets: HashMap<SteamId, i64>,
    pub times_until_heal: Vec<Duration>,
    pub last_empty_uber: Option<DateTime<Utc>>,
}

impl HealingSummary {
    pub fn avg_charge_len(&self) -> f64 {
        if self.charge_lengths.is_empty() {
            return 0.0;
        }
        self.charge_lengths.iter().sum::<f64>() / self.charge_lengths.len() as f64
    }
}

/// Per-player match state. All mutation is additive except `name`
/// (set once, on first sight) and `team`/`current_class` (overwritten
/// by join/spawn events only).
#[derive(Debug, Clone, Default)]
pub struct Player {
    pub name: String,
    pub steam_id: SteamId,
    pub team: Team,
    pub kills: Vec<Kill>,
    pub deaths: Vec<Kill>,
    pub assists: i32,
    pub revenges: i32,
    pub dominations: i32,
    pub dominated: i32,
    /// Self healing, not medic healing
    pub healed: i64,
    pub damage: i64,
    pub damage_taken: i64,
    pub small_med_packs: i32,
    pub medium_med_packs: i32,
    pub full_med_packs: i32,
    pub shots_fired: i32,
    pub shots_hit: i32,
    pub backstabs: i32,
    pub headshots: i32,
    pub airshots: i32,
    pub captures: i32,
    pub defenses: i32,
    pub classes: HashMap<PlayerClass, ClassStats>,
    /// Present once the player has spawned as medic
    pub healing: Option<HealingSummary>,
    pub current_class: PlayerClass,
}

impl Player {
    pub fn new(steam_id: SteamId) -> Self {
        Player {
            steam_id,
            ..Default::default()
        }
    }

    /// Record a class as played, creating the healing summary on the
    /// first medic spawn, and make it current.
    pub fn add_class(&mut self, class: PlayerClass) {
        if !self.classes.contains_key(&class) {
            self.classes.insert(class, ClassStats::default());
            if class == PlayerClass::Medic && self.healing.is_none() {
                self.healing = Some(HealingSummary::default());
            }
        }
        self.current_class = class;
    }

    pub fn class_stats(&mut self) -> &mut ClassStats {
        self.classes.entry(self.current_class).or_default()
    }

    /// Healing summary, created on demand. Drop attribution can reach
    /// players that never spawned as medic in this log.
    pub fn healing_mut(&mut self) -> &mut HealingSummary {
        self.healing.get_or_insert_with(HealingSummary::default)
    }

    pub fn packs(&self) -> i32 {
        self.small_med_packs + self.medium_med_packs + self.full_med_packs
    }

    /// Kills and assists per death
    pub fn kad(&self) -> f64 {
        (self.kills.len() + self.assists as usize) as f64 / self.deaths.len() as f64
    }

    /// Kills per death
    pub fn kd(&self) -> f64 {
        self.kills.len() as f64 / self.deaths.len() as f64
    }
}

/// One completed capture/control cycle, appended to the match at
/// round-win time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundSummary {
    /// Server-reported length
    pub length: Duration,
    /// Wall-clock length, pause-inclusive
    pub length_rt: TimeDelta,
    pub score_red: i32,
    pub score_blu: i32,
    pub kills_red: i32,
    pub kills_blu: i32,
    pub ubers_red: i32,
    pub ubers_blu: i32,
    pub damage_red: i64,
    pub damage_blu: i64,
    pub winner: Team,
    /// Team that took the first mid-round capture; `Spec` until one does
    pub mid_fight: Team,
}

/// Whole-match running totals per side, independent of round records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamSummary {
    pub kills: i32,
    pub damage: i64,
    pub charges: i32,
    pub drops: i32,
    pub caps: i32,
    pub mid_fights: i32,
}

/// One chat line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub steam_id: SteamId,
    pub team_chat: bool,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Root aggregate for one parsed log.
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub id: i64,
    pub players: HashMap<SteamId, Player>,
    pub teams: HashMap<Team, TeamSummary>,
    pub match_name: String,
    pub map: String,
    pub score_red: i32,
    pub score_blu: i32,
    /// Coarse total length supplied by the metadata API, if merged
    pub duration: Option<Duration>,
    pub created_on: Option<DateTime<Utc>>,
    pub rounds: Vec<RoundSummary>,
    pub messages: Vec<Message>,
    // Transient reducer state
    pub(crate) round_started: bool,
    pub(crate) round_start_time: DateTime<Utc>,
    pub(crate) current_round: i32,
    pub(crate) current_round_summary: Option<RoundSummary>,
    pub(crate) paused: bool,
    pub(crate) last_pause: DateTime<Utc>,
    pub(crate) last_pause_duration: TimeDelta,
}

impl Default for MatchSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchSummary {
    pub fn new() -> Self {
        let mut teams = HashMap::new();
        teams.insert(Team::Red, TeamSummary::default());
        teams.insert(Team::Blu, TeamSummary::default());
        MatchSummary {
            id: 0,
            players: HashMap::new(),
            teams,
            match_name: String::new(),
            map: String::new(),
            score_red: 0,
            score_blu: 0,
            duration: None,
            created_on: None,
            rounds: Vec::new(),
            messages: Vec::new(),
            round_started: false,
            round_start_time: DateTime::<Utc>::MIN_UTC,
            current_round: 1,
            current_round_summary: None,
            paused: false,
            last_pause: DateTime::<Utc>::MIN_UTC,
            last_pause_duration: TimeDelta::zero(),
        }
    }

    pub(crate) fn is_round_started(&self) -> bool {
        self.round_started
    }

    /// Side aggregate, lazily created. Spectators carry no aggregate;
    /// the map only ever holds the two playing sides.
    pub(crate) fn team_summary(&mut self, team: Team) -> Option<&mut TeamSummary> {
        if team == Team::Spec {
            return None;
        }
        Some(self.teams.entry(team).or_default())
    }

    /// Look up a player by identity, creating them on first reference.
    /// Invalid identities resolve to no player at all.
    pub(crate) fn player_mut(&mut self, steam_id: SteamId) -> Option<&mut Player> {
        if !steam_id.is_valid() {
            return None;
        }
        Some(
            self.players
                .entry(steam_id)
                .or_insert_with(|| Player::new(steam_id)),
        )
    }

    pub fn player(&self, steam_id: SteamId) -> Option<&Player> {
        self.players.get(&steam_id)
    }

    /// Sum of all completed rounds' server-reported lengths.
    pub fn total_length(&self) -> Duration {
        self.rounds.iter().map(|r| r.length).sum()
    }

    pub fn players_by_class(&self, class: PlayerClass) -> Vec<&Player> {
        let mut found: Vec<&Player> = self
            .players
            .values()
            .filter(|p| p.classes.contains_key(&class))
            .collect();
        found.sort_by_key(|p| p.steam_id);
        found
    }

    /// Damage per minute of total (server-reported) match length.
    pub fn damage_per_min(&self, player: &Player) -> f64 {
        player.damage as f64 / (self.total_length().as_secs_f64() / 60.0)
    }

    pub fn damage_taken_per_min(&self, player: &Player) -> f64 {
        player.damage_taken as f64 / (self.total_length().as_secs_f64() / 60.0)
    }
}
