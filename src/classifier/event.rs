//! Typed events decoded from classified lines.
//!
//! The classifier yields a raw field map; this boundary decodes it
//! eagerly into one tagged variant per event kind, each carrying only
//! the fields that kind uses. Handlers downstream never re-parse text.

use super::decode::{
    parse_datetime, parse_float, parse_health_pack, parse_medigun, parse_num, parse_params,
    parse_player_class, parse_pos, parse_team, HealthPack, Medigun, PlayerClass, Position, SteamId,
    Team,
};
use super::rules::{FieldMap, LineKind, RuleSet};
use chrono::{DateTime, Utc};

/// A player token as it appears on a log line: display name, decoded
/// identity and the team tag current at the time of the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRef {
    pub name: String,
    pub steam_id: SteamId,
    pub team: Team,
}

/// One classified, typed log line.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Connected { actor: PlayerRef },
    Disconnected { actor: PlayerRef },
    Validated { actor: PlayerRef },
    Entered { actor: PlayerRef },
    JoinedTeam { actor: PlayerRef, team: Team },
    SpawnedAs { actor: PlayerRef, class: PlayerClass },
    ChangedClass { actor: PlayerRef, class: PlayerClass },
    Suicide { actor: PlayerRef, pos: Position },
    ShotFired { actor: PlayerRef, weapon: String },
    ShotHit { actor: PlayerRef, weapon: String },
    Damage {
        actor: PlayerRef,
        target: Option<PlayerRef>,
        damage: i64,
        real_damage: i64,
        weapon: String,
        healing: i64,
        airshot: bool,
    },
    Killed {
        actor: PlayerRef,
        victim: PlayerRef,
        weapon: String,
        attacker_pos: Position,
        victim_pos: Position,
        custom: Option<String>,
    },
    KillAssist { actor: PlayerRef, victim: PlayerRef },
    Domination { actor: PlayerRef, victim: PlayerRef },
    Revenge { actor: PlayerRef },
    Pickup { actor: PlayerRef, item: String, health: Option<HealthPack> },
    Chat { actor: PlayerRef, message: String, team_chat: bool },
    EmptyUber { actor: PlayerRef },
    MedicDeath { actor: PlayerRef, victim: PlayerRef, healing: i64, charged: bool },
    MedicDeathEx { actor: PlayerRef, charge_pct: i64 },
    LostUberAdvantage { actor: PlayerRef, seconds: i64 },
    ChargeReady { actor: PlayerRef },
    ChargeDeployed { actor: PlayerRef, medigun: Medigun },
    ChargeEnded { actor: PlayerRef, duration: f64 },
    Healed { actor: PlayerRef, target: PlayerRef, healing: i64 },
    Extinguished { actor: PlayerRef, target: PlayerRef, weapon: String },
    ObjectBuilt { actor: PlayerRef, object: String, pos: Position },
    ObjectCarried { actor: PlayerRef, object: String, pos: Position },
    ObjectDropped { actor: PlayerRef, object: String, pos: Position },
    ObjectKilled { actor: PlayerRef, object: String, owner: PlayerRef },
    ObjectDetonated { actor: PlayerRef, object: String, pos: Position },
    FirstHealAfterSpawn { actor: PlayerRef, seconds: f64 },
    CaptureBlocked { actor: PlayerRef, cp_name: String },
    PointCaptured {
        team: Team,
        cp_name: String,
        expected_cappers: i64,
        cappers: Vec<SteamId>,
    },
    RoundOvertime,
    RoundStart,
    RoundWin { winner: Team },
    RoundLength { seconds: f64 },
    GameOver { reason: String },
    TeamScore { team: Team, score: i64 },
    TeamFinalScore { team: Team, score: i64 },
    Paused,
    Unpaused,
}

/// Outcome of classifying and decoding one raw line.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Event(Event),
    /// Known-benign noise, silently dropped
    Skipped,
    /// No rule matched; logged by the caller
    Unhandled,
}

fn field<'a>(fields: &'a FieldMap, name: &str) -> &'a str {
    fields.get(name).map(String::as_str).unwrap_or("")
}

fn actor(fields: &FieldMap) -> PlayerRef {
    PlayerRef {
        name: field(fields, "name").to_string(),
        steam_id: SteamId::parse(field(fields, "sid")),
        team: parse_team(field(fields, "team")),
    }
}

fn target(fields: &FieldMap) -> PlayerRef {
    PlayerRef {
        name: field(fields, "name2").to_string(),
        steam_id: SteamId::parse(field(fields, "sid2")),
        team: parse_team(field(fields, "team2")),
    }
}

/// Decode the free-form damage parameter tail. The `damage` key is
/// ignored once a positive `realdamage` has been seen, matching the
/// upstream log emitter's ordering quirk.
fn damage_fields(body: &str) -> (i64, i64, String, i64, bool) {
    let params = parse_params(body);
    let mut damage = 0i64;
    let mut real_damage = 0i64;
    let mut weapon = String::new();
    let mut healing = 0i64;
    let mut airshot = false;
    for (i, p) in params.iter().enumerate() {
        let value = || params.get(i + 1).map(String::as_str).unwrap_or("");
        match p.as_str() {
            "damage" => {
                if real_damage == 0 {
                    damage = parse_num("damage", value());
                }
            }
            "realdamage" => real_damage = parse_num("realdamage", value()),
            "weapon" => weapon = value().to_string(),
            "healing" => healing = parse_num("healing", value()),
            "airshot" => airshot = true,
            _ => {}
        }
    }
    (damage, real_damage, weapon, healing, airshot)
}

impl RuleSet {
    /// Classify and decode one trimmed line.
    pub fn parse_line(&self, line: &str) -> Parsed {
        let Some((fields, kind)) = self.classify(line) else {
            return Parsed::Unhandled;
        };
        if kind == LineKind::Skipped {
            return Parsed::Skipped;
        }
        let timestamp = parse_datetime(field(&fields, "date"), field(&fields, "time"));
        let kind = self.decode_kind(kind, &fields);
        Parsed::Event(Event { timestamp, kind })
    }

    fn decode_kind(&self, kind: LineKind, f: &FieldMap) -> EventKind {
        match kind {
            LineKind::Connected => EventKind::Connected { actor: actor(f) },
            LineKind::Disconnected => EventKind::Disconnected { actor: actor(f) },
            LineKind::Validated => EventKind::Validated { actor: actor(f) },
            LineKind::Entered => EventKind::Entered { actor: actor(f) },
            LineKind::JoinedTeam => EventKind::JoinedTeam {
                actor: actor(f),
                team: parse_team(field(f, "newteam")),
            },
            LineKind::SpawnedAs => EventKind::SpawnedAs {
                actor: actor(f),
                class: parse_player_class(field(f, "class")),
            },
            LineKind::ChangedRole => EventKind::ChangedClass {
                actor: actor(f),
                class: parse_player_class(field(f, "class")),
            },
            LineKind::Suicide => EventKind::Suicide {
                actor: actor(f),
                pos: parse_pos(field(f, "pos")),
            },
            LineKind::ShotFired => EventKind::ShotFired {
                actor: actor(f),
                weapon: field(f, "weapon").to_string(),
            },
            LineKind::ShotHit => EventKind::ShotHit {
                actor: actor(f),
                weapon: field(f, "weapon").to_string(),
            },
            LineKind::Damage => {
                let (damage, real_damage, weapon, healing, airshot) =
                    damage_fields(field(f, "body"));
                EventKind::Damage {
                    actor: actor(f),
                    target: Some(target(f)),
                    damage,
                    real_damage,
                    weapon,
                    healing,
                    airshot,
                }
            }
            // Older logs only report a bare damage total with no target
            LineKind::DamageLegacy => EventKind::Damage {
                actor: actor(f),
                target: None,
                damage: parse_num("damage", field(f, "damage")),
                real_damage: 0,
                weapon: String::new(),
                healing: 0,
                airshot: false,
            },
            LineKind::Killed => EventKind::Killed {
                actor: actor(f),
                victim: target(f),
                weapon: field(f, "weapon").to_string(),
                attacker_pos: parse_pos(field(f, "apos")),
                victim_pos: parse_pos(field(f, "vpos")),
                custom: None,
            },
            LineKind::KilledCustom => EventKind::Killed {
                actor: actor(f),
                victim: target(f),
                weapon: field(f, "weapon").to_string(),
                attacker_pos: parse_pos(field(f, "apos")),
                victim_pos: parse_pos(field(f, "vpos")),
                custom: Some(field(f, "customkill").to_string()),
            },
            LineKind::KillAssist => EventKind::KillAssist {
                actor: actor(f),
                victim: target(f),
            },
            LineKind::Domination => EventKind::Domination {
                actor: actor(f),
                victim: target(f),
            },
            LineKind::Revenge => EventKind::Revenge { actor: actor(f) },
            LineKind::Pickup => {
                let item = field(f, "item").to_string();
                // Ammo pickups are recognised but carry no counter
                let health = if item.contains("ammo") {
                    None
                } else {
                    Some(parse_health_pack(&item))
                };
                EventKind::Pickup {
                    actor: actor(f),
                    item,
                    health,
                }
            }
            LineKind::Say => EventKind::Chat {
                actor: actor(f),
                message: field(f, "msg").to_string(),
                team_chat: false,
            },
            LineKind::SayTeam => EventKind::Chat {
                actor: actor(f),
                message: field(f, "msg").to_string(),
                team_chat: true,
            },
            LineKind::EmptyUber => EventKind::EmptyUber { actor: actor(f) },
            LineKind::MedicDeath => EventKind::MedicDeath {
                actor: actor(f),
                victim: target(f),
                healing: parse_num("healing", field(f, "healing")),
                charged: field(f, "uber") == "1",
            },
            LineKind::MedicDeathEx => EventKind::MedicDeathEx {
                actor: actor(f),
                charge_pct: parse_num("uberpct", field(f, "pct")),
            },
            LineKind::LostUberAdvantage => EventKind::LostUberAdvantage {
                actor: actor(f),
                seconds: parse_num("time", field(f, "advtime")),
            },
            LineKind::ChargeReady => EventKind::ChargeReady { actor: actor(f) },
            LineKind::ChargeDeployed => EventKind::ChargeDeployed {
                actor: actor(f),
                medigun: parse_medigun(field(f, "medigun")),
            },
            LineKind::ChargeEnded => EventKind::ChargeEnded {
                actor: actor(f),
                duration: parse_float("duration", field(f, "duration")),
            },
            LineKind::Healed => EventKind::Healed {
                actor: actor(f),
                target: target(f),
                healing: parse_num("healing", field(f, "healing")),
            },
            LineKind::Extinguished => EventKind::Extinguished {
                actor: actor(f),
                target: target(f),
                weapon: field(f, "weapon").to_string(),
            },
            LineKind::ObjectBuilt => EventKind::ObjectBuilt {
                actor: actor(f),
                object: field(f, "object").to_string(),
                pos: parse_pos(field(f, "pos")),
            },
            LineKind::ObjectCarried => EventKind::ObjectCarried {
                actor: actor(f),
                object: field(f, "object").to_string(),
                pos: parse_pos(field(f, "pos")),
            },
            LineKind::ObjectDropped => EventKind::ObjectDropped {
                actor: actor(f),
                object: field(f, "object").to_string(),
                pos: parse_pos(field(f, "pos")),
            },
            LineKind::ObjectKilled | LineKind::ObjectKilledAssisted => EventKind::ObjectKilled {
                actor: actor(f),
                object: field(f, "object").to_string(),
                owner: target(f),
            },
            LineKind::ObjectDetonated => EventKind::ObjectDetonated {
                actor: actor(f),
                object: field(f, "object").to_string(),
                pos: parse_pos(field(f, "pos")),
            },
            LineKind::FirstHealAfterSpawn => EventKind::FirstHealAfterSpawn {
                actor: actor(f),
                seconds: parse_float("healtime", field(f, "healtime")),
            },
            LineKind::CaptureBlocked => EventKind::CaptureBlocked {
                actor: actor(f),
                cp_name: field(f, "cpname").to_string(),
            },
            LineKind::PointCaptured => {
                // The capper list rides in the free-form tail as
                // (playerN "<token>") pairs; each token is re-classified
                // against the generic player pattern.
                let params = parse_params(field(f, "body"));
                let mut cappers = Vec::new();
                for (i, p) in params.iter().enumerate() {
                    if p.starts_with("player") {
                        if let Some(token) = params.get(i + 1) {
                            if let Some(sid) = self.player_identity(token) {
                                cappers.push(sid);
                            }
                        }
                    }
                }
                EventKind::PointCaptured {
                    team: parse_team(field(f, "team")),
                    cp_name: field(f, "cpname").to_string(),
                    expected_cappers: parse_num("numcappers", field(f, "numcappers")),
                    cappers,
                }
            }
            LineKind::RoundOvertime => EventKind::RoundOvertime,
            LineKind::RoundStart => EventKind::RoundStart,
            LineKind::RoundWin => EventKind::RoundWin {
                winner: parse_team(field(f, "winner")),
            },
            LineKind::RoundLength => EventKind::RoundLength {
                seconds: parse_float("seconds", field(f, "len")),
            },
            LineKind::GameOver => EventKind::GameOver {
                reason: field(f, "reason").to_string(),
            },
            LineKind::TeamScore => EventKind::TeamScore {
                team: parse_team(field(f, "team")),
                score: parse_num("score", field(f, "score")),
            },
            LineKind::TeamFinalScore => EventKind::TeamFinalScore {
                team: parse_team(field(f, "team")),
                score: parse_num("score", field(f, "score")),
            },
            LineKind::Paused => EventKind::Paused,
            LineKind::Unpaused => EventKind::Unpaused,
            // Filtered out in parse_line before decoding
            LineKind::Skipped => unreachable!("skip rule decoded as event"),
        }
    }
}
