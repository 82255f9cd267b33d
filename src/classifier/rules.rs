//! Ordered pattern rules for raw log lines.
//!
//! Classification is first-match-wins over an ordered rule list, so the
//! ordering is a correctness mechanism: some patterns are strict
//! supersets of others (the parameterised damage format vs the legacy
//! damage-only one, the assisted object kill vs the weaponed variant).
//! More specific and newer formats come first, the benign-noise skip
//! rule last. The list is built once per [`RuleSet`] and is immutable
//! afterwards, so one set can be shared read-only across threads
//! parsing distinct matches.

use regex::Regex;
use std::collections::HashMap;

/// Named-capture map extracted from a matched line. Optional groups
/// that did not participate in the match are present with an empty
/// value, never absent.
pub type FieldMap = HashMap<String, String>;

/// Raw classification tag for one log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Connected,
    Disconnected,
    Validated,
    Entered,
    JoinedTeam,
    ChangedRole,
    SpawnedAs,
    Suicide,
    ShotFired,
    ShotHit,
    Damage,
    DamageLegacy,
    Killed,
    KilledCustom,
    KillAssist,
    Domination,
    Revenge,
    Pickup,
    Say,
    SayTeam,
    EmptyUber,
    MedicDeath,
    MedicDeathEx,
    LostUberAdvantage,
    ChargeReady,
    ChargeDeployed,
    ChargeEnded,
    Healed,
    Extinguished,
    ObjectBuilt,
    ObjectCarried,
    ObjectDropped,
    ObjectKilled,
    ObjectKilledAssisted,
    ObjectDetonated,
    FirstHealAfterSpawn,
    CaptureBlocked,
    PointCaptured,
    RoundOvertime,
    RoundStart,
    RoundWin,
    RoundLength,
    GameOver,
    TeamScore,
    TeamFinalScore,
    Paused,
    Unpaused,
    /// Known-benign noise (literal "undefined" payloads)
    Skipped,
}

/// Common line prefix: `L 07/10/2019 - 23:28:01: `
const RX_DATE: &str = r#"^L\s(?P<date>.+?)\s+-\s+(?P<time>.+?):\s+"#;

/// Quoted player token, e.g. `"funk. Bubi<382><STEAM_0:1:22649331><Red>"`
const RX_PLAYER: &str =
    r#""(?P<name>.+?)<(?P<pid>\d+)><(?P<sid>.+?)><(?P<team>(Unassigned|Red|Blue|Spectator))?>""#;

/// Second player token for "against"-style events
const RX_TARGET: &str =
    r#""(?P<name2>.+?)<(?P<pid2>\d+)><(?P<sid2>.+?)><(?P<team2>(Unassigned|Red|Blue|Spectator)?)>""#;

/// The immutable ordered classification table.
pub struct RuleSet {
    rules: Vec<(Regex, LineKind)>,
    /// Unanchored player token pattern, used to recover identities from
    /// free-form parameter tails (point captures).
    player: Regex,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        // Every pattern here is a string literal; a failed compile is a
        // programming error, so expect() is acceptable at construction.
        let rx = |pattern: &str| Regex::new(pattern).expect("invalid classifier rule");
        // Most player events share the date + player prefix
        let dp = format!(r"{}{}\s+", RX_DATE, RX_PLAYER);
        let dpx = |tail: &str| rx(&format!("{}{}", dp, tail));
        let dx = |tail: &str| rx(&format!("{}{}", RX_DATE, tail));
        let against = |tail: &str| rx(&format!(r#"{}triggered "{}" against {}"#, dp, tail, RX_TARGET));

        // Ordered by expected frequency first (shots and damage dominate
        // real logs), then by specificity where patterns overlap.
        let rules = vec![
            (dpx(r#"triggered "shot_fired" \(weapon "(?P<weapon>\S+)"\)"#), LineKind::ShotFired),
            (dpx(r#"triggered "shot_hit" \(weapon "(?P<weapon>\S+)"\)"#), LineKind::ShotHit),
            (
                rx(&format!(r#"{}triggered "damage" against {}\s(?P<body>.+?)$"#, dp, RX_TARGET)),
                LineKind::Damage,
            ),
            (dpx(r#"triggered "damage" \(damage "(?P<damage>\d+)"\)"#), LineKind::DamageLegacy),
            // Custom kill first: the plain kill pattern's lazy weapon
            // group would otherwise swallow the customkill parameter.
            (
                rx(&format!(
                    r#"{}killed {} with "(?P<weapon>.+?)" \(customkill "(?P<customkill>.+?)"\) \(attacker_position "(?P<apos>.+?)"\) \(victim_position "(?P<vpos>.+?)"\)"#,
                    dp, RX_TARGET
                )),
                LineKind::KilledCustom,
            ),
            (
                rx(&format!(
                    r#"{}killed {} with "(?P<weapon>.+?)" \(attacker_position "(?P<apos>.+?)"\) \(victim_position "(?P<vpos>.+?)"\)"#,
                    dp, RX_TARGET
                )),
                LineKind::Killed,
            ),
            (rx(&format!(r#"{}triggered "healed" against {} \(healing "(?P<healing>\d+)"\)"#, dp, RX_TARGET)), LineKind::Healed),
            (
                rx(&format!(
                    r#"{}triggered "kill assist" against {} \(assister_position "(?P<aspos>.+?)"\) \(attacker_position "(?P<apos>.+?)"\) \(victim_position "(?P<vpos>.+?)"\)"#,
                    dp, RX_TARGET
                )),
                LineKind::KillAssist,
            ),
            (dpx(r#"picked up item "(?P<item>\S+)""#), LineKind::Pickup),
            (dpx(r#"spawned as "(?P<class>\S+)""#), LineKind::SpawnedAs),
            (dpx(r#"STEAM USERID validated$"#), LineKind::Validated),
            (dpx(r#"connected, address"#), LineKind::Connected),
            (dpx(r#"entered the game"#), LineKind::Entered),
            // The player prefix already claims the `team` group name, so
            // the destination team gets its own name here.
            (dpx(r#"joined team "(?P<newteam>(Red|Blue|Spectator))""#), LineKind::JoinedTeam),
            (dpx(r#"changed role to "(?P<class>.+?)""#), LineKind::ChangedRole),
            (
                dpx(r#"committed suicide with "(?P<weapon>.+?)" \(attacker_position "(?P<pos>.+?)"\)"#),
                LineKind::Suicide,
            ),
            (dpx(r#"triggered "chargeready""#), LineKind::ChargeReady),
            (
                dpx(r#"triggered "chargedeployed"( \(medigun "(?P<medigun>.+?)"\))?"#),
                LineKind::ChargeDeployed,
            ),
            (dpx(r#"triggered "chargeended" \(duration "(?P<duration>.+?)"\)"#), LineKind::ChargeEnded),
            (against("domination"), LineKind::Domination),
            (
                rx(&format!(
                    r#"{}triggered "revenge" against {}\s?(\(assist "(?P<assist>\d+)"\))?"#,
                    dp, RX_TARGET
                )),
                LineKind::Revenge,
            ),
            (dpx(r#"say\s+"(?P<msg>.+?)"$"#), LineKind::Say),
            (dpx(r#"say_team\s+"(?P<msg>.+?)"$"#), LineKind::SayTeam),
            (dpx(r#"triggered "empty_uber""#), LineKind::EmptyUber),
            // `time` is already claimed by the line-prefix pattern
            (dpx(r#"triggered "lost_uber_advantage" \(time "(?P<advtime>\d+)"\)"#), LineKind::LostUberAdvantage),
            (
                rx(&format!(
                    r#"{}triggered "medic_death" against {} \(healing "(?P<healing>\d+)"\) \(ubercharge "(?P<uber>\d+)"\)"#,
                    dp, RX_TARGET
                )),
                LineKind::MedicDeath,
            ),
            (dpx(r#"triggered "medic_death_ex" \(uberpct "(?P<pct>\d+)"\)"#), LineKind::MedicDeathEx),
            (
                rx(&format!(
                    r#"{}triggered "player_extinguished" against {} with "(?P<weapon>.+?)" \(attacker_position "(?P<apos>.+?)"\) \(victim_position "(?P<vpos>.+?)"\)"#,
                    dp, RX_TARGET
                )),
                LineKind::Extinguished,
            ),
            (
                dpx(r#"triggered "player_builtobject" \(object "(?P<object>.+?)"\) \(position "(?P<pos>.+?)"\)"#),
                LineKind::ObjectBuilt,
            ),
            (
                dpx(r#"triggered "player_carryobject" \(object "(?P<object>.+?)"\) \(position "(?P<pos>.+?)"\)"#),
                LineKind::ObjectCarried,
            ),
            (
                dpx(r#"triggered "player_dropobject" \(object "(?P<object>.+?)"\) \(position "(?P<pos>.+?)"\)"#),
                LineKind::ObjectDropped,
            ),
            (
                rx(&format!(
                    r#"{}triggered "killedobject" \(object "(?P<object>.+?)"\) \(objectowner {}\)\s+\(assist "1"\) \(assister_position "(?P<aspos>.+?)"\) \(attacker_position "(?P<apos>.+?)"\)"#,
                    dp, RX_TARGET
                )),
                LineKind::ObjectKilledAssisted,
            ),
            (
                rx(&format!(
                    r#"{}triggered "killedobject" \(object "(?P<object>.+?)"\) \(weapon "(?P<weapon>.+?)"\) \(objectowner {}\) \(attacker_position "(?P<apos>.+?)"\)"#,
                    dp, RX_TARGET
                )),
                LineKind::ObjectKilled,
            ),
            (
                dpx(r#"triggered "object_detonated" \(object "(?P<object>.+?)"\) \(position "(?P<pos>.+?)"\)"#),
                LineKind::ObjectDetonated,
            ),
            (
                dpx(r#"triggered "first_heal_after_spawn" \(time "(?P<healtime>.+?)"\)"#),
                LineKind::FirstHealAfterSpawn,
            ),
            (
                rx(&format!(
                    r#"{}Team "(?P<team>.+?)" triggered "pointcaptured" \(cp "(?P<cp>\d+)"\) \(cpname "(?P<cpname>.+?)"\) \(numcappers "(?P<numcappers>\d+)"\)(\s+(?P<body>.+?))$"#,
                    RX_DATE
                )),
                LineKind::PointCaptured,
            ),
            (
                dpx(r#"triggered "captureblocked" \(cp "(?P<cp>\d+)"\) \(cpname "(?P<cpname>.+?)"\) \(position "(?P<pos>.+?)"\)"#),
                LineKind::CaptureBlocked,
            ),
            (dpx(r#"disconnected \(reason "(?P<reason>.+?)"\)"#), LineKind::Disconnected),
            (dx(r#"World triggered "Round_Overtime""#), LineKind::RoundOvertime),
            (dx(r#"World triggered "Round_Start""#), LineKind::RoundStart),
            (dx(r#"World triggered "Round_Win" \(winner "(?P<winner>.+?)"\)"#), LineKind::RoundWin),
            (dx(r#"World triggered "Round_Length" \(seconds "(?P<len>.+?)"\)"#), LineKind::RoundLength),
            (dx(r#"World triggered "Game_Over" reason "(?P<reason>.+?)""#), LineKind::GameOver),
            (
                dx(r#"Team "(?P<team>Red|Blue)" current score "(?P<score>\d+)" with "(?P<players>\d+)" players"#),
                LineKind::TeamScore,
            ),
            (
                dx(r#"Team "(?P<team>Red|Blue)" final score "(?P<score>\d+)" with "(?P<players>\d+)" players"#),
                LineKind::TeamFinalScore,
            ),
            (dx(r#"World triggered "Game_Paused""#), LineKind::Paused),
            (dx(r#"World triggered "Game_Unpaused""#), LineKind::Unpaused),
            // Last so it can never shadow a real event
            (rx(r#""undefined"$"#), LineKind::Skipped),
        ];

        let player = rx(
            r#"(?P<name>.+?)<(?P<pid>\d+)><(?P<sid>.+?)><(?P<team>(Unassigned|Red|Blue|Spectator)?)>"#,
        );

        RuleSet { rules, player }
    }

    /// Classify one trimmed line: the named-field map of the first
    /// matching rule plus its kind, or `None` when no rule matched.
    pub fn classify(&self, line: &str) -> Option<(FieldMap, LineKind)> {
        for (rx, kind) in &self.rules {
            if let Some(caps) = rx.captures(line) {
                let mut fields = FieldMap::new();
                for name in rx.capture_names().flatten() {
                    let value = caps.name(name).map(|m| m.as_str()).unwrap_or("");
                    fields.insert(name.to_string(), value.to_string());
                }
                return Some((fields, *kind));
            }
        }
        None
    }

    /// Recover a steam identity from a bare player token inside a
    /// free-form parameter tail.
    pub fn player_identity(&self, token: &str) -> Option<super::decode::SteamId> {
        let caps = self.player.captures(token)?;
        let sid = super::decode::SteamId::parse(caps.name("sid").map(|m| m.as_str())?);
        Some(sid)
    }
}
