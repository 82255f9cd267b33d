//! Human-readable match reports.
//!
//! Renders already-computed match state into text tables: the player
//! scoreboard, per-medic healing breakdowns and the chat transcript.
//! Everything in here is read-only over a fully reduced match.

use super::table::{to_table, TableOpts};
use crate::classifier::decode::PlayerClass;
use crate::summary::model::{MatchSummary, Player};

/// Scoreboard sort attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortBy {
    #[default]
    Team,
    Name,
    Kills,
    Assists,
    Deaths,
    Damage,
    DamagePerMin,
    Kad,
    Kd,
    DamageTaken,
    Packs,
    Backstabs,
    Headshots,
    Airshots,
    Captures,
}

fn sort_players(summary: &MatchSummary, players: &mut [&Player], by: SortBy) {
    players.sort_by(|a, b| {
        let ord = match by {
            SortBy::Team => a.team.cmp(&b.team),
            SortBy::Name => a.name.cmp(&b.name),
            SortBy::Kills => a.kills.len().cmp(&b.kills.len()),
            SortBy::Assists => a.assists.cmp(&b.assists),
            SortBy::Deaths => a.deaths.len().cmp(&b.deaths.len()),
            SortBy::Damage => a.damage.cmp(&b.damage),
            SortBy::DamagePerMin => summary
                .damage_per_min(a)
                .partial_cmp(&summary.damage_per_min(b))
                .unwrap_or(std::cmp::Ordering::Equal),
            SortBy::Kad => a.kad().partial_cmp(&b.kad()).unwrap_or(std::cmp::Ordering::Equal),
            SortBy::Kd => a.kd().partial_cmp(&b.kd()).unwrap_or(std::cmp::Ordering::Equal),
            SortBy::DamageTaken => a.damage_taken.cmp(&b.damage_taken),
            SortBy::Packs => a.packs().cmp(&b.packs()),
            SortBy::Backstabs => a.backstabs.cmp(&b.backstabs),
            SortBy::Headshots => a.headshots.cmp(&b.headshots),
            SortBy::Airshots => a.airshots.cmp(&b.airshots),
            SortBy::Captures => a.captures.cmp(&b.captures),
        };
        ord.reverse()
    });
}

/// Render the player scoreboard.
pub fn players_table(summary: &MatchSummary, sort_by: SortBy) -> String {
    let headers = [
        "Team", "Name", "Class", "K", "A", "D", "DA", "DA/M", "KA/D", "K/D", "DT", "DT/M", "HP",
        "BS", "HS", "AS", "CAP",
    ];
    let mut rows: Vec<Vec<String>> = vec![headers.iter().map(|h| h.to_string()).collect()];

    let mut players: Vec<&Player> = summary.players.values().collect();
    sort_players(summary, &mut players, sort_by);

    for p in players {
        let mut classes: Vec<&str> = p
            .classes
            .keys()
            .map(|c| &c.label()[0..2])
            .collect();
        classes.sort_unstable();
        rows.push(vec![
            p.team.label().to_string(),
            p.name.clone(),
            classes.join(", "),
            p.kills.len().to_string(),
            p.assists.to_string(),
            p.deaths.len().to_string(),
            p.damage.to_string(),
            format!("{:.1}", summary.damage_per_min(p)),
            format!("{:.1}", p.kad()),
            format!("{:.1}", p.kd()),
            p.damage_taken.to_string(),
            format!("{:.1}", summary.damage_taken_per_min(p)),
            p.packs().to_string(),
            p.backstabs.to_string(),
            p.headshots.to_string(),
            p.airshots.to_string(),
            p.captures.to_string(),
        ]);
    }

    let opts = TableOpts {
        title: format!(
            "Logs for match #{} [len: {:?}] RED: {} BLU: {}",
            summary.id,
            summary.total_length(),
            summary.score_red,
            summary.score_blu
        ),
        ..Default::default()
    };
    to_table(&rows, &opts)
}

/// Render one medic's healing breakdown.
fn healing_table(summary: &MatchSummary, medic: &Player) -> String {
    let Some(sums) = medic.healing.as_ref() else {
        return String::new();
    };
    let mut rows: Vec<Vec<String>> = Vec::new();
    rows.push(vec!["Healing".into(), sums.healing.to_string()]);
    let mut guns: Vec<String> = sums
        .charges
        .iter()
        .map(|(gun, count)| format!("{}: {}", &gun.label()[0..1], count))
        .collect();
    guns.sort_unstable();
    rows.push(vec!["Charges".into(), guns.join(", ")]);
    rows.push(vec!["Drops".into(), sums.drops.to_string()]);
    rows.push(vec!["Avg Uber Len.".into(), format!("{:.1}", sums.avg_charge_len())]);
    rows.push(vec![
        "Near Full Deaths".into(),
        sums.near_full_charge_deaths.to_string(),
    ]);
    rows.push(vec![
        "Maj. Adv. Lost".into(),
        sums.major_advantages_lost.to_string(),
    ]);
    rows.push(vec!["Heal Targets".into(), String::new()]);

    let mut targets: Vec<(&crate::classifier::decode::SteamId, &i64)> =
        sums.targets.iter().collect();
    targets.sort_by(|a, b| b.1.cmp(a.1));
    for (steam_id, healed) in targets {
        let name = summary
            .player(*steam_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| steam_id.to_string());
        let pct = if sums.healing > 0 {
            (*healed as f64 / sums.healing as f64) * 100.0
        } else {
            0.0
        };
        rows.push(vec![name, format!("{} ({:.0}%)", healed, pct)]);
    }

    let opts = TableOpts {
        title: format!("Healing {}", medic.name),
        ..Default::default()
    };
    to_table(&rows, &opts)
}

/// Render healing breakdowns for every medic, side by side.
pub fn healing_report(summary: &MatchSummary) -> String {
    let tables: Vec<Vec<String>> = summary
        .players_by_class(PlayerClass::Medic)
        .iter()
        .map(|medic| {
            healing_table(summary, medic)
                .split('\n')
                .map(str::to_string)
                .collect()
        })
        .collect();
    if tables.is_empty() {
        return String::new();
    }
    let height = tables.iter().map(Vec::len).max().unwrap_or(0);
    let mut rows = Vec::new();
    for i in 0..height {
        let cols: Vec<String> = tables
            .iter()
            .map(|t| t.get(i).cloned().unwrap_or_default())
            .collect();
        rows.push(cols.join("   "));
    }
    rows.join("\n")
}

/// Render the chat transcript.
pub fn chat_report(summary: &MatchSummary) -> String {
    let mut out = String::new();
    for msg in &summary.messages {
        let name = summary
            .player(msg.steam_id)
            .map(|p| p.name.as_str())
            .unwrap_or("?");
        let scope = if msg.team_chat { "(team) " } else { "" };
        out.push_str(&format!(
            "{} {}{}: {}\n",
            msg.timestamp.format("%H:%M:%S"),
            scope,
            name,
            msg.message
        ));
    }
    out
}
