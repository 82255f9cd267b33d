//! Field decoders for classified log lines.
//!
//! Every decoder in here is total: bad input never fails the whole
//! event. Decoders fall back to a zero value (or `Utc::now()` for
//! timestamps), log a warning, and let processing continue.

use crate::utils::config::LOG_DATETIME_FORMAT;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::warn;
use std::fmt;

/// Offset between a SteamID64 and the 32-bit account id it wraps
/// (individual accounts in the public universe).
const STEAM64_BASE: u64 = 76_561_197_960_265_728;

/// 64-bit persistent player identity.
///
/// Log lines carry identities in the SID3 form (`[U:1:57823119]`) or the
/// legacy form (`STEAM_0:1:22649331`). Both resolve to the same 64-bit
/// value. Placeholder identities ("BOT", "Console", empty) resolve to
/// [`SteamId::INVALID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SteamId(pub u64);

impl SteamId {
    /// Reported-invalid sentinel for unparsable identities
    pub const INVALID: SteamId = SteamId(0);

    /// Decode any supported identity form, falling back to the invalid
    /// sentinel.
    pub fn parse(raw: &str) -> SteamId {
        let raw = raw.trim();
        if raw.is_empty() {
            return SteamId::INVALID;
        }
        if let Some(id) = Self::from_sid3(raw) {
            return id;
        }
        if let Some(id) = Self::from_steam2(raw) {
            return id;
        }
        SteamId::INVALID
    }

    /// `[U:1:57823119]` -> 76561198018088847
    fn from_sid3(raw: &str) -> Option<SteamId> {
        let inner = raw.strip_prefix("[U:1:")?.strip_suffix(']')?;
        let account: u64 = inner.parse().ok()?;
        if account == 0 {
            return None;
        }
        Some(SteamId(STEAM64_BASE + account))
    }

    /// `STEAM_0:1:22649331` -> account id `z * 2 + y`
    fn from_steam2(raw: &str) -> Option<SteamId> {
        let rest = raw.strip_prefix("STEAM_")?;
        let mut parts = rest.splitn(3, ':');
        let _universe: u64 = parts.next()?.parse().ok()?;
        let y: u64 = parts.next()?.parse().ok()?;
        let z: u64 = parts.next()?.parse().ok()?;
        if y > 1 {
            return None;
        }
        let account = z.checked_mul(2)?.checked_add(y)?;
        if account == 0 {
            return None;
        }
        Some(SteamId(STEAM64_BASE + account))
    }

    pub fn is_valid(&self) -> bool {
        self.0 > STEAM64_BASE
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team a player is assigned to. `Spec` doubles as the "neither side"
/// sentinel for round mid-fight tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Team {
    #[default]
    Spec,
    Red,
    Blu,
}

impl Team {
    pub fn label(&self) -> &'static str {
        match self {
            Team::Red => "RED",
            Team::Blu => "BLU",
            Team::Spec => "SPEC",
        }
    }
}

pub fn parse_team(team: &str) -> Team {
    match team {
        "Red" => Team::Red,
        "Blue" => Team::Blu,
        _ => Team::Spec,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerClass {
    #[default]
    Spectator,
    Scout,
    Soldier,
    Pyro,
    Demo,
    Heavy,
    Engineer,
    Medic,
    Sniper,
    Spy,
}

impl PlayerClass {
    pub fn label(&self) -> &'static str {
        match self {
            PlayerClass::Scout => "Scout",
            PlayerClass::Soldier => "Soldier",
            PlayerClass::Pyro => "Pyro",
            PlayerClass::Demo => "Demoman",
            PlayerClass::Heavy => "Heavy",
            PlayerClass::Engineer => "Engineer",
            PlayerClass::Medic => "Medic",
            PlayerClass::Sniper => "Sniper",
            PlayerClass::Spy => "Spy",
            PlayerClass::Spectator => "Spectator",
        }
    }
}

pub fn parse_player_class(class: &str) -> PlayerClass {
    match class.to_lowercase().as_str() {
        "scout" => PlayerClass::Scout,
        "soldier" => PlayerClass::Soldier,
        "pyro" => PlayerClass::Pyro,
        "demoman" => PlayerClass::Demo,
        "heavyweapons" => PlayerClass::Heavy,
        "engineer" => PlayerClass::Engineer,
        "medic" => PlayerClass::Medic,
        "sniper" => PlayerClass::Sniper,
        "spy" => PlayerClass::Spy,
        _ => PlayerClass::Spectator,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Medigun {
    Uber,
    Kritzkrieg,
    Vaccinator,
    QuickFix,
}

impl Medigun {
    pub fn label(&self) -> &'static str {
        match self {
            Medigun::Kritzkrieg => "Kritzkrieg",
            Medigun::Vaccinator => "Vaccinator",
            Medigun::QuickFix => "Quick-Fix",
            Medigun::Uber => "Uber",
        }
    }
}

pub fn parse_medigun(gun: &str) -> Medigun {
    match gun.to_lowercase().as_str() {
        "medigun" => Medigun::Uber,
        "kritzkrieg" => Medigun::Kritzkrieg,
        "vaccinator" => Medigun::Vaccinator,
        _ => Medigun::QuickFix,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthPack {
    Small,
    Medium,
    Full,
}

pub fn parse_health_pack(item: &str) -> HealthPack {
    match item {
        "medkit_small" => HealthPack::Small,
        "medkit_medium" => HealthPack::Medium,
        "medkit_full" => HealthPack::Full,
        _ => HealthPack::Medium,
    }
}

/// World coordinates attached to kill and object events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

/// Parse a `"x y z"` triple. Components that fail to parse default to 0.
pub fn parse_pos(pos: &str) -> Position {
    let mut parts = pos.splitn(3, ' ');
    let mut component = |axis: &str| -> i64 {
        let raw = parts.next().unwrap_or("");
        raw.parse().unwrap_or_else(|_| {
            warn!("Failed to parse {} pos: {}", axis, raw);
            0
        })
    };
    Position {
        x: component("x"),
        y: component("y"),
        z: component("z"),
    }
}

/// Combine the date and time substrings of a line prefix into one
/// instant. Unparsable input falls back to the current time.
pub fn parse_datetime(date: &str, time: &str) -> DateTime<Utc> {
    let joined = format!("{} {}", date, time);
    match NaiveDateTime::parse_from_str(&joined, LOG_DATETIME_FORMAT) {
        Ok(dt) => dt.and_utc(),
        Err(err) => {
            warn!("Failed to parse date '{}': {}", joined, err);
            Utc::now()
        }
    }
}

/// Split a trailing `(key "value") (key "value")` parameter tail into a
/// flat ordered token list with quotes and parens stripped.
///
/// Used for events whose payload shape varies by weapon or ability, most
/// notably `damage` and `pointcaptured`.
pub fn parse_params(body: &str) -> Vec<String> {
    body.replace(['(', ')', '"'], "")
        .split(' ')
        .map(str::to_string)
        .collect()
}

/// Best-effort integer parse for parameter values, zero on failure.
pub fn parse_num(key: &str, raw: &str) -> i64 {
    raw.parse().unwrap_or_else(|_| {
        warn!("Failed to parse {}: {}", key, raw);
        0
    })
}

/// Best-effort float parse for parameter values, zero on failure.
pub fn parse_float(key: &str, raw: &str) -> f64 {
    raw.parse().unwrap_or_else(|_| {
        warn!("Failed to parse {}: {}", key, raw);
        0.0
    })
}
