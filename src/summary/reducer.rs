//! Event application: folds classified events into the match model.
//!
//! Application is strictly sequential; the reducer performs no locking
//! and assumes one caller per match. Combat-effect events (damage,
//! kills, suicides, shots) are no-ops outside an active round, while
//! roster events (team joins, class spawns) always apply.

use crate::classifier::decode::{HealthPack, Medigun, PlayerClass, Position, SteamId, Team};
use crate::classifier::event::{Event, EventKind, Parsed, PlayerRef};
use crate::classifier::rules::RuleSet;
use crate::summary::model::{Kill, MatchSummary, Message, RoundSummary};
use crate::utils::config::{
    is_real_damage_weapon, NEAR_FULL_CHARGE_PCT, PACK_WEIGHT_FULL, PACK_WEIGHT_MEDIUM,
    PACK_WEIGHT_SMALL,
};
use chrono::{DateTime, Utc};
use log::warn;
use std::time::Duration;

impl MatchSummary {
    /// Classify, decode and apply one raw log line. Unmatched lines are
    /// logged and ignored; they do not imply corruption.
    pub fn apply_line(&mut self, rules: &RuleSet, line: &str) {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return;
        }
        match rules.parse_line(line) {
            Parsed::Skipped => {}
            Parsed::Unhandled => warn!("Unhandled message: {}", line),
            Parsed::Event(event) => self.apply_event(event),
        }
    }

    /// Apply one typed event, dispatching to exactly one handler.
    pub fn apply_event(&mut self, event: Event) {
        let ts = event.timestamp;
        match event.kind {
            // Connection bookkeeping only creates the player record
            EventKind::Connected { actor }
            | EventKind::Disconnected { actor }
            | EventKind::Validated { actor }
            | EventKind::Entered { actor }
            | EventKind::ChargeReady { actor } => {
                self.touch(&actor);
            }
            EventKind::JoinedTeam { actor, team } => {
                if let Some(id) = self.touch(&actor) {
                    self.join_team(id, team);
                }
            }
            EventKind::SpawnedAs { actor, class } => {
                if let Some(id) = self.touch(&actor) {
                    self.spawned_as(id, class);
                    // The spawn line carries the player's team tag too
                    self.join_team(id, actor.team);
                }
            }
            EventKind::ChangedClass { actor, class } => {
                // Functionally an alias for spawning as the class
                if let Some(id) = self.touch(&actor) {
                    self.spawned_as(id, class);
                }
            }
            EventKind::Suicide { actor, pos } => {
                if let Some(id) = self.touch(&actor) {
                    self.suicide(id, pos, ts);
                }
            }
            EventKind::ShotFired { actor, .. } => {
                if let Some(id) = self.touch(&actor) {
                    if self.is_round_started() {
                        if let Some(p) = self.player_mut(id) {
                            p.shots_fired += 1;
                        }
                    }
                }
            }
            EventKind::ShotHit { actor, .. } => {
                if let Some(id) = self.touch(&actor) {
                    if self.is_round_started() {
                        if let Some(p) = self.player_mut(id) {
                            p.shots_hit += 1;
                        }
                    }
                }
            }
            EventKind::Damage {
                actor,
                target,
                damage,
                real_damage,
                weapon,
                healing,
                airshot,
            } => {
                let target_id = target.as_ref().and_then(|t| self.touch(t));
                let Some(id) = self.touch(&actor) else {
                    return;
                };
                // Backstab-class weapons under-report nominal damage
                let amount = if is_real_damage_weapon(&weapon) && real_damage > 0 {
                    real_damage
                } else {
                    damage
                };
                self.damage(id, amount, target_id);
                // Some attacks heal the attacker as well
                if healing > 0 {
                    if let Some(p) = self.player_mut(id) {
                        p.healed += healing;
                    }
                }
                if airshot {
                    if let Some(p) = self.player_mut(id) {
                        p.airshots += 1;
                    }
                }
            }
            EventKind::Killed {
                actor,
                victim,
                attacker_pos,
                victim_pos,
                custom,
                ..
            } => {
                let (Some(id), Some(victim_id)) = (self.touch(&actor), self.touch(&victim)) else {
                    return;
                };
                match custom.as_deref() {
                    Some("headshot") => {
                        if let Some(p) = self.player_mut(id) {
                            p.headshots += 1;
                        }
                    }
                    Some("backstab") => {
                        if let Some(p) = self.player_mut(id) {
                            p.backstabs += 1;
                        }
                    }
                    _ => {}
                }
                self.killed(id, attacker_pos, victim_id, victim_pos, ts);
            }
            EventKind::KillAssist { actor, victim } => {
                self.touch(&victim);
                if let Some(id) = self.touch(&actor) {
                    if let Some(p) = self.player_mut(id) {
                        p.assists += 1;
                        p.class_stats().assists += 1;
                    }
                }
            }
            EventKind::Domination { actor, victim } => {
                if let (Some(id), Some(victim_id)) = (self.touch(&actor), self.touch(&victim)) {
                    if let Some(p) = self.player_mut(id) {
                        p.dominations += 1;
                    }
                    if let Some(p) = self.player_mut(victim_id) {
                        p.dominated += 1;
                    }
                }
            }
            EventKind::Revenge { actor } => {
                if let Some(id) = self.touch(&actor) {
                    if let Some(p) = self.player_mut(id) {
                        p.revenges += 1;
                    }
                }
            }
            EventKind::Pickup { actor, health, .. } => {
                let Some(id) = self.touch(&actor) else {
                    return;
                };
                // Ammo pickups carry no counter
                let Some(tier) = health else { return };
                if let Some(p) = self.player_mut(id) {
                    match tier {
                        HealthPack::Small => p.small_med_packs += PACK_WEIGHT_SMALL,
                        HealthPack::Medium => p.medium_med_packs += PACK_WEIGHT_MEDIUM,
                        HealthPack::Full => p.full_med_packs += PACK_WEIGHT_FULL,
                    }
                }
            }
            EventKind::Chat {
                actor,
                message,
                team_chat,
            } => {
                if let Some(id) = self.touch(&actor) {
                    self.messages.push(Message {
                        steam_id: id,
                        team_chat,
                        message,
                        timestamp: ts,
                    });
                }
            }
            EventKind::EmptyUber { actor } => {
                if let Some(id) = self.touch(&actor) {
                    if let Some(p) = self.player_mut(id) {
                        p.healing_mut().last_empty_uber = Some(ts);
                    }
                }
            }
            EventKind::MedicDeath {
                actor,
                victim,
                charged,
                ..
            } => {
                let killer = self.touch(&actor);
                let victim_id = self.touch(&victim);
                if !charged {
                    return;
                }
                // A charge lost because its carrier died is attributed
                // to the opponent who ended it.
                if let Some(p) = killer.and_then(|id| self.player_mut(id)) {
                    p.healing_mut().drops += 1;
                }
                if let Some(team) = victim_id
                    .and_then(|id| self.player(id))
                    .map(|p| p.team)
                {
                    if let Some(t) = self.team_summary(team) {
                        t.drops += 1;
                    }
                }
            }
            EventKind::MedicDeathEx { actor, charge_pct } => {
                let medic = self.touch(&actor);
                if charge_pct <= NEAR_FULL_CHARGE_PCT {
                    return;
                }
                if let Some(p) = medic.and_then(|id| self.player_mut(id)) {
                    p.healing_mut().near_full_charge_deaths += 1;
                }
            }
            EventKind::LostUberAdvantage { actor, .. } => {
                if let Some(p) = self.touch(&actor).and_then(|id| self.player_mut(id)) {
                    p.healing_mut().major_advantages_lost += 1;
                }
            }
            EventKind::ChargeDeployed { actor, medigun } => {
                if let Some(id) = self.touch(&actor) {
                    self.charge_deployed(id, medigun);
                }
            }
            EventKind::ChargeEnded { actor, duration } => {
                if let Some(p) = self.touch(&actor).and_then(|id| self.player_mut(id)) {
                    p.healing_mut().charge_lengths.push(duration);
                }
            }
            EventKind::Healed {
                actor,
                target,
                healing,
            } => {
                let (Some(id), Some(target_id)) = (self.touch(&actor), self.touch(&target)) else {
                    return;
                };
                if let Some(p) = self.player_mut(id) {
                    // Only sustained medic healing is summarised here;
                    // item-based healing from other classes is not.
                    if p.current_class == PlayerClass::Medic {
                        let sums = p.healing_mut();
                        sums.healing += healing;
                        *sums.targets.entry(target_id).or_insert(0) += healing;
                    }
                }
            }
            // Recognised but not aggregated
            EventKind::Extinguished { actor, target, .. } => {
                self.touch(&actor);
                self.touch(&target);
            }
            EventKind::ObjectBuilt { actor, .. }
            | EventKind::ObjectCarried { actor, .. }
            | EventKind::ObjectDropped { actor, .. }
            | EventKind::ObjectDetonated { actor, .. } => {
                self.touch(&actor);
            }
            EventKind::ObjectKilled { actor, owner, .. } => {
                self.touch(&actor);
                self.touch(&owner);
            }
            EventKind::FirstHealAfterSpawn { actor, seconds } => {
                if let Some(p) = self.touch(&actor).and_then(|id| self.player_mut(id)) {
                    p.healing_mut()
                        .times_until_heal
                        .push(duration_from_secs(seconds));
                }
            }
            EventKind::CaptureBlocked { actor, .. } => {
                if let Some(p) = self.touch(&actor).and_then(|id| self.player_mut(id)) {
                    p.defenses += 1;
                }
            }
            EventKind::PointCaptured {
                team,
                expected_cappers,
                cappers,
                ..
            } => {
                self.point_captured(team, expected_cappers, cappers);
            }
            EventKind::RoundStart => self.round_start(ts),
            EventKind::RoundLength { seconds } => self.round_length(seconds, ts),
            EventKind::RoundWin { winner } => self.round_win(ts, winner),
            EventKind::Paused => self.pause(ts),
            EventKind::Unpaused => self.unpause(ts),
            // World bookkeeping with no model counterpart
            EventKind::RoundOvertime
            | EventKind::GameOver { .. }
            | EventKind::TeamScore { .. }
            | EventKind::TeamFinalScore { .. } => {}
        }
    }

    /// Ensure the referenced player exists, record the first-seen name,
    /// and hand back the identity. Invalid identities yield nothing.
    fn touch(&mut self, actor: &PlayerRef) -> Option<SteamId> {
        let player = self.player_mut(actor.steam_id)?;
        if player.name.is_empty() {
            player.name = actor.name.clone();
        }
        Some(player.steam_id)
    }

    /// Spectating does not clear an earlier real team assignment.
    fn join_team(&mut self, id: SteamId, team: Team) {
        if team == Team::Spec {
            return;
        }
        if let Some(p) = self.player_mut(id) {
            p.team = team;
        }
    }

    fn spawned_as(&mut self, id: SteamId, class: PlayerClass) {
        if let Some(p) = self.player_mut(id) {
            p.add_class(class);
        }
    }

    fn damage(&mut self, id: SteamId, amount: i64, target: Option<SteamId>) {
        if !self.is_round_started() {
            return;
        }
        let Some(attacker) = self.player_mut(id) else {
            return;
        };
        attacker.damage += amount;
        attacker.class_stats().damage += amount;
        let team = attacker.team;

        if let Some(t) = self.team_summary(team) {
            t.damage += amount;
        }
        if let Some(round) = self.current_round_summary.as_mut() {
            match team {
                Team::Red => round.damage_red += amount,
                Team::Blu => round.damage_blu += amount,
                Team::Spec => {}
            }
        }
        // Not present on older log formats
        if let Some(victim) = target.and_then(|t| self.player_mut(t)) {
            victim.damage_taken += amount;
        }
    }

    fn killed(
        &mut self,
        id: SteamId,
        attacker_pos: Position,
        victim_id: SteamId,
        victim_pos: Position,
        ts: DateTime<Utc>,
    ) {
        if !self.is_round_started() {
            return;
        }
        let Some(attacker) = self.player_mut(id) else {
            return;
        };
        attacker.kills.push(Kill {
            attacker_pos,
            victim_pos,
            other: victim_id,
            created_on: ts,
        });
        attacker.class_stats().kills += 1;
        let team = attacker.team;

        if let Some(t) = self.team_summary(team) {
            t.kills += 1;
        }
        if let Some(round) = self.current_round_summary.as_mut() {
            match team {
                Team::Red => round.kills_red += 1,
                Team::Blu => round.kills_blu += 1,
                Team::Spec => {}
            }
        }
        if let Some(victim) = self.player_mut(victim_id) {
            victim.deaths.push(Kill {
                attacker_pos,
                victim_pos,
                other: id,
                created_on: ts,
            });
            victim.class_stats().deaths += 1;
        }
    }

    fn suicide(&mut self, id: SteamId, pos: Position, ts: DateTime<Utc>) {
        if !self.is_round_started() {
            return;
        }
        if let Some(p) = self.player_mut(id) {
            // Self-inflicted: the actor is their own other party
            p.deaths.push(Kill {
                attacker_pos: pos,
                victim_pos: pos,
                other: id,
                created_on: ts,
            });
            p.class_stats().deaths += 1;
        }
    }

    fn charge_deployed(&mut self, id: SteamId, medigun: Medigun) {
        let Some(p) = self.player_mut(id) else { return };
        *p.healing_mut().charges.entry(medigun).or_insert(0) += 1;
        let team = p.team;
        if let Some(t) = self.team_summary(team) {
            t.charges += 1;
        }
        if let Some(round) = self.current_round_summary.as_mut() {
            match team {
                Team::Red => round.ubers_red += 1,
                Team::Blu => round.ubers_blu += 1,
                Team::Spec => {}
            }
        }
    }

    fn point_captured(&mut self, team: Team, expected: i64, cappers: Vec<SteamId>) {
        if cappers.is_empty() {
            return;
        }
        if cappers.len() as i64 != expected {
            warn!(
                "Capturing player count mismatch: got {}, expected {}",
                cappers.len(),
                expected
            );
            return;
        }
        for id in &cappers {
            if let Some(p) = self.player_mut(*id) {
                p.captures += 1;
            }
        }
        if let Some(t) = self.team_summary(team) {
            t.caps += 1;
        }
        let first_mid = self
            .current_round_summary
            .as_ref()
            .is_some_and(|r| r.mid_fight == Team::Spec);
        if first_mid {
            if let Some(round) = self.current_round_summary.as_mut() {
                round.mid_fight = team;
            }
            if let Some(t) = self.team_summary(team) {
                t.mid_fights += 1;
            }
        }
    }

    fn round_start(&mut self, ts: DateTime<Utc>) {
        self.round_started = true;
        self.round_start_time = ts;
        // Fresh accumulator; mid fight unclaimed
        self.current_round_summary = Some(RoundSummary::default());
    }

    /// The length event, not the win, advances the round index. It can
    /// arrive after the win has already completed the round, in which
    /// case the reported length lands on that completed round.
    fn round_length(&mut self, seconds: f64, ts: DateTime<Utc>) {
        let real_time = ts - self.round_start_time;
        let length = duration_from_secs(seconds);
        if let Some(r) = self.current_round_summary.as_mut() {
            r.length = length;
            r.length_rt = real_time;
        } else if let Some(r) = self.rounds.last_mut() {
            r.length = length;
            r.length_rt = real_time;
        }
        self.current_round += 1;
    }

    fn round_win(&mut self, ts: DateTime<Utc>, winner: Team) {
        self.round_started = false;
        match winner {
            Team::Red => self.score_red += 1,
            Team::Blu => self.score_blu += 1,
            Team::Spec => {}
        }
        if let Some(mut round) = self.current_round_summary.take() {
            round.length_rt += ts - self.round_start_time;
            round.winner = winner;
            round.score_red = self.score_red;
            round.score_blu = self.score_blu;
            self.rounds.push(round);
        }
    }

    fn pause(&mut self, ts: DateTime<Utc>) {
        // Duplicate pause lines must not move the pause start
        if self.paused {
            return;
        }
        self.last_pause = ts;
        self.paused = true;
    }

    fn unpause(&mut self, ts: DateTime<Utc>) {
        // Dont count the duplicate pause/unpause log lines
        if self.paused {
            self.last_pause_duration = ts - self.last_pause;
            self.paused = false;
        }
    }
}

/// Seconds fields are free text; "inf" and "nan" parse as valid floats
/// and negative values appear on clock-skewed servers. Anything
/// unrepresentable collapses to zero.
fn duration_from_secs(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or_else(|_| {
        warn!("Unusable seconds value: {}", seconds);
        Duration::ZERO
    })
}
