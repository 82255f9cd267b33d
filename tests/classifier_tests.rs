use logstf_stats::classifier::decode::{
    Medigun, PlayerClass, Position, SteamId, Team,
};
use logstf_stats::classifier::event::{Event, EventKind, Parsed};
use logstf_stats::classifier::rules::RuleSet;
use pretty_assertions::assert_eq;

fn parse(rules: &RuleSet, line: &str) -> Event {
    match rules.parse_line(line) {
        Parsed::Event(event) => event,
        other => panic!("expected event for line {:?}, got {:?}", line, other),
    }
}

#[test]
fn test_damage_with_params() {
    let rules = RuleSet::new();
    let event = parse(
        &rules,
        r#"L 07/10/2019 - 23:28:01: "rad<6><[U:1:57823119]><Red>" triggered "damage" against "z/<14><[U:1:66656848]><Blue>" (damage "11") (weapon "syringegun_medic")"#,
    );
    match event.kind {
        EventKind::Damage {
            actor,
            target,
            damage,
            real_damage,
            weapon,
            healing,
            airshot,
        } => {
            assert_eq!(actor.name, "rad");
            assert_eq!(actor.steam_id, SteamId::parse("[U:1:57823119]"));
            assert_eq!(actor.team, Team::Red);
            let target = target.expect("target player");
            assert_eq!(target.name, "z/");
            assert_eq!(target.team, Team::Blu);
            assert_eq!(damage, 11);
            assert_eq!(real_damage, 0);
            assert_eq!(weapon, "syringegun_medic");
            assert_eq!(healing, 0);
            assert!(!airshot);
        }
        other => panic!("expected damage, got {:?}", other),
    }
}

#[test]
fn test_damage_with_real_damage_and_healing() {
    let rules = RuleSet::new();
    let event = parse(
        &rules,
        r#"L 07/10/2019 - 23:29:54: "rad<6><[U:1:57823119]><Red>" triggered "damage" against "z/<14><[U:1:66656848]><Blue>" (damage "88") (realdamage "32") (weapon "ubersaw") (healing "110")"#,
    );
    match event.kind {
        EventKind::Damage {
            damage,
            real_damage,
            weapon,
            healing,
            ..
        } => {
            assert_eq!(damage, 88);
            assert_eq!(real_damage, 32);
            assert_eq!(weapon, "ubersaw");
            assert_eq!(healing, 110);
        }
        other => panic!("expected damage, got {:?}", other),
    }
}

#[test]
fn test_legacy_damage_has_no_target() {
    let rules = RuleSet::new();
    let event = parse(
        &rules,
        r#"L 02/19/2015 - 21:29:18: "Jak<13><[U:1:59956641]><Blue>" triggered "damage" (damage "36")"#,
    );
    match event.kind {
        EventKind::Damage { target, damage, .. } => {
            assert!(target.is_none());
            assert_eq!(damage, 36);
        }
        other => panic!("expected damage, got {:?}", other),
    }
}

#[test]
fn test_shots() {
    let rules = RuleSet::new();
    let fired = parse(
        &rules,
        r#"L 07/10/2019 - 23:28:02: "rad<6><[U:1:57823119]><Red>" triggered "shot_fired" (weapon "syringegun_medic")"#,
    );
    assert!(matches!(fired.kind, EventKind::ShotFired { .. }));
    let hit = parse(
        &rules,
        r#"L 07/10/2019 - 23:28:02: "z/<14><[U:1:66656848]><Blue>" triggered "shot_hit" (weapon "blackbox")"#,
    );
    match hit.kind {
        EventKind::ShotHit { weapon, .. } => assert_eq!(weapon, "blackbox"),
        other => panic!("expected shot_hit, got {:?}", other),
    }
}

#[test]
fn test_kill_and_assist() {
    let rules = RuleSet::new();
    let kill = parse(
        &rules,
        r#"L 07/10/2019 - 23:50:32: "rad<6><[U:1:57823119]><Red>" killed "17<17><[U:1:156985751]><Blue>" with "quake_rl" (attacker_position "-1688 -2242 795") (victim_position "-1666 -2536 690")"#,
    );
    match kill.kind {
        EventKind::Killed {
            weapon,
            attacker_pos,
            victim_pos,
            custom,
            ..
        } => {
            assert_eq!(weapon, "quake_rl");
            assert_eq!(
                attacker_pos,
                Position {
                    x: -1688,
                    y: -2242,
                    z: 795
                }
            );
            assert_eq!(
                victim_pos,
                Position {
                    x: -1666,
                    y: -2536,
                    z: 690
                }
            );
            assert!(custom.is_none());
        }
        other => panic!("expected kill, got {:?}", other),
    }
    let assist = parse(
        &rules,
        r#"L 07/10/2019 - 23:50:32: "stan FIN_SLAYER<10><[U:1:127171744]><Red>" triggered "kill assist" against "17<17><[U:1:156985751]><Blue>" (assister_position "-1080 -1752 723") (attacker_position "-1688 -2242 795") (victim_position "-1666 -2536 690")"#,
    );
    assert!(matches!(assist.kind, EventKind::KillAssist { .. }));
}

#[test]
fn test_custom_kill_keeps_customkill_field() {
    let rules = RuleSet::new();
    let event = parse(
        &rules,
        r#"L 07/11/2019 - 00:27:17: "Houston<46><[U:1:96048647]><Red>" killed "STiNGHAN<51><[U:1:63723362]><Blue>" with "big_earner" (customkill "backstab") (attacker_position "747 661 208") (victim_position "701 608 208")"#,
    );
    match event.kind {
        EventKind::Killed { weapon, custom, .. } => {
            assert_eq!(weapon, "big_earner");
            assert_eq!(custom.as_deref(), Some("backstab"));
        }
        other => panic!("expected custom kill, got {:?}", other),
    }
}

#[test]
fn test_roster_lines() {
    let rules = RuleSet::new();
    let validated = parse(
        &rules,
        r#"L 07/10/2019 - 23:13:56: "Graba<3><[U:1:95947321]><>" STEAM USERID validated"#,
    );
    match validated.kind {
        EventKind::Validated { actor } => assert_eq!(actor.team, Team::Spec),
        other => panic!("expected validated, got {:?}", other),
    }
    let connected = parse(
        &rules,
        r#"L 07/10/2019 - 23:15:20: "wonszu #LANsilesia2019<8><[U:1:60952177]><>" connected, address "0.0.0.0:51378""#,
    );
    assert!(matches!(connected.kind, EventKind::Connected { .. }));
    let entered = parse(
        &rules,
        r#"L 07/10/2019 - 23:15:33: "wonszu #LANsilesia2019<8><[U:1:60952177]><>" entered the game"#,
    );
    assert!(matches!(entered.kind, EventKind::Entered { .. }));
    let disconnected = parse(
        &rules,
        r#"L 07/11/2019 - 00:49:19: "AMP_T<55><[U:1:163893616]><Blue>" disconnected (reason "AMP_T timed out")"#,
    );
    assert!(matches!(disconnected.kind, EventKind::Disconnected { .. }));
}

#[test]
fn test_joined_team_uses_destination_team() {
    let rules = RuleSet::new();
    let event = parse(
        &rules,
        r#"L 07/10/2019 - 23:16:05: "Kwq<9><[U:1:96748980]><Unassigned>" joined team "Blue""#,
    );
    match event.kind {
        EventKind::JoinedTeam { actor, team } => {
            assert_eq!(actor.team, Team::Spec);
            assert_eq!(team, Team::Blu);
        }
        other => panic!("expected joined team, got {:?}", other),
    }
}

#[test]
fn test_class_lines() {
    let rules = RuleSet::new();
    let spawned = parse(
        &rules,
        r#"L 07/10/2019 - 23:47:33: "the lord of the pings<11><[U:1:114143419]><Blue>" spawned as "Scout""#,
    );
    match spawned.kind {
        EventKind::SpawnedAs { class, .. } => assert_eq!(class, PlayerClass::Scout),
        other => panic!("expected spawn, got {:?}", other),
    }
    let changed = parse(
        &rules,
        r#"L 07/10/2019 - 23:16:05: "Kwq<9><[U:1:96748980]><Blue>" changed role to "soldier""#,
    );
    match changed.kind {
        EventKind::ChangedClass { class, .. } => assert_eq!(class, PlayerClass::Soldier),
        other => panic!("expected role change, got {:?}", other),
    }
}

#[test]
fn test_suicide() {
    let rules = RuleSet::new();
    let event = parse(
        &rules,
        r#"L 07/10/2019 - 23:16:39: "Kwq<9><[U:1:96748980]><Blue>" committed suicide with "world" (attacker_position "-1435 -1965 518")"#,
    );
    match event.kind {
        EventKind::Suicide { pos, .. } => {
            assert_eq!(
                pos,
                Position {
                    x: -1435,
                    y: -1965,
                    z: 518
                }
            );
        }
        other => panic!("expected suicide, got {:?}", other),
    }
}

#[test]
fn test_chat_lines() {
    let rules = RuleSet::new();
    let say = parse(
        &rules,
        r#"L 07/10/2019 - 23:26:36: "thaZu.pl<4><[U:1:79473044]><Spectator>" say " 811 ms : Kwq""#,
    );
    match say.kind {
        EventKind::Chat {
            message, team_chat, ..
        } => {
            assert_eq!(message, " 811 ms : Kwq");
            assert!(!team_chat);
        }
        other => panic!("expected chat, got {:?}", other),
    }
    let say_team = parse(
        &rules,
        r#"L 07/10/2019 - 23:26:36: "thaZu.pl<4><[U:1:79473044]><Spectator>" say_team " 811 ms : Kwq""#,
    );
    assert!(matches!(
        say_team.kind,
        EventKind::Chat { team_chat: true, .. }
    ));
}

#[test]
fn test_medic_lines() {
    let rules = RuleSet::new();
    let empty = parse(
        &rules,
        r#"L 07/10/2019 - 23:26:43: "Kwq<9><[U:1:96748980]><Blue>" triggered "empty_uber""#,
    );
    assert!(matches!(empty.kind, EventKind::EmptyUber { .. }));
    let lost = parse(
        &rules,
        r#"L 07/10/2019 - 23:47:32: "SEND HELP<16><[U:1:84528002]><Blue>" triggered "lost_uber_advantage" (time "44")"#,
    );
    match lost.kind {
        EventKind::LostUberAdvantage { seconds, .. } => assert_eq!(seconds, 44),
        other => panic!("expected lost advantage, got {:?}", other),
    }
    let death = parse(
        &rules,
        r#"L 07/10/2019 - 23:47:52: "Graba<3><[U:1:95947321]><Blue>" triggered "medic_death" against "wonder<7><[U:1:34284979]><Red>" (healing "3218") (ubercharge "0")"#,
    );
    match death.kind {
        EventKind::MedicDeath {
            healing, charged, ..
        } => {
            assert_eq!(healing, 3218);
            assert!(!charged);
        }
        other => panic!("expected medic death, got {:?}", other),
    }
    let death_ex = parse(
        &rules,
        r#"L 07/10/2019 - 23:47:52: "wonder<7><[U:1:34284979]><Red>" triggered "medic_death_ex" (uberpct "32")"#,
    );
    match death_ex.kind {
        EventKind::MedicDeathEx { charge_pct, .. } => assert_eq!(charge_pct, 32),
        other => panic!("expected medic death ex, got {:?}", other),
    }
    let ready = parse(
        &rules,
        r#"L 07/11/2019 - 00:11:04: "wonder<7><[U:1:34284979]><Red>" triggered "chargeready""#,
    );
    assert!(matches!(ready.kind, EventKind::ChargeReady { .. }));
    let deployed = parse(
        &rules,
        r#"L 07/11/2019 - 00:11:11: "wonder<7><[U:1:34284979]><Red>" triggered "chargedeployed" (medigun "medigun")"#,
    );
    match deployed.kind {
        EventKind::ChargeDeployed { medigun, .. } => assert_eq!(medigun, Medigun::Uber),
        other => panic!("expected charge deploy, got {:?}", other),
    }
    let ended = parse(
        &rules,
        r#"L 07/11/2019 - 00:11:18: "wonder<7><[U:1:34284979]><Red>" triggered "chargeended" (duration "7.5")"#,
    );
    match ended.kind {
        EventKind::ChargeEnded { duration, .. } => assert_eq!(duration, 7.5),
        other => panic!("expected charge end, got {:?}", other),
    }
    let healed = parse(
        &rules,
        r#"L 07/11/2019 - 00:11:19: "wonder<7><[U:1:34284979]><Red>" triggered "healed" against "stanFIN_SLAYER<10><[U:1:127171744]><Red>" (healing "16")"#,
    );
    match healed.kind {
        EventKind::Healed { healing, .. } => assert_eq!(healing, 16),
        other => panic!("expected heal, got {:?}", other),
    }
    let first_heal = parse(
        &rules,
        r#"L 10/25/2019 - 12:19:46: "SCOTTY T<27><[U:1:97282856]><Blue>" triggered "first_heal_after_spawn" (time "1.6")"#,
    );
    match first_heal.kind {
        EventKind::FirstHealAfterSpawn { seconds, .. } => assert_eq!(seconds, 1.6),
        other => panic!("expected first heal, got {:?}", other),
    }
}

#[test]
fn test_revenge_with_and_without_assist() {
    let rules = RuleSet::new();
    let with_assist = parse(
        &rules,
        r#"L 07/10/2019 - 23:50:32: "stan FIN_SLAYER<10><[U:1:127171744]><Red>" triggered "revenge" against "17<17><[U:1:156985751]><Blue>" (assist "1")"#,
    );
    assert!(matches!(with_assist.kind, EventKind::Revenge { .. }));
    let without = parse(
        &rules,
        r#"L 07/11/2019 - 00:48:29: "defa<49><[U:1:129337538]><Red>" triggered "revenge" against "AlesKee<59><[U:1:206838965]><Blue>""#,
    );
    assert!(matches!(without.kind, EventKind::Revenge { .. }));
}

#[test]
fn test_domination() {
    let rules = RuleSet::new();
    let event = parse(
        &rules,
        r#"L 07/11/2019 - 00:11:30: "kartka<15><[U:1:130519691]><Red>" triggered "domination" against "17<17><[U:1:156985751]><Blue>" (assist "1")"#,
    );
    assert!(matches!(event.kind, EventKind::Domination { .. }));
}

#[test]
fn test_pickup_lines() {
    let rules = RuleSet::new();
    let ammo = parse(
        &rules,
        r#"L 07/10/2019 - 23:47:34: "g о а т z<13><[U:1:41435165]><Red>" picked up item "ammopack_small""#,
    );
    match ammo.kind {
        EventKind::Pickup { item, health, .. } => {
            assert_eq!(item, "ammopack_small");
            assert!(health.is_none());
        }
        other => panic!("expected pickup, got {:?}", other),
    }
    let med = parse(
        &rules,
        r#"L 07/10/2019 - 23:47:34: "g о а т z<13><[U:1:41435165]><Red>" picked up item "medkit_small""#,
    );
    match med.kind {
        EventKind::Pickup { health, .. } => assert!(health.is_some()),
        other => panic!("expected pickup, got {:?}", other),
    }
}

#[test]
fn test_object_lines() {
    let rules = RuleSet::new();
    let built = parse(
        &rules,
        r#"L 10/25/2019 - 12:14:45: "von<16><[U:1:181030438]><Blue>" triggered "player_builtobject" (object "OBJ_SENTRYGUN") (position "-1689 -2062 59")"#,
    );
    match built.kind {
        EventKind::ObjectBuilt { object, .. } => assert_eq!(object, "OBJ_SENTRYGUN"),
        other => panic!("expected object built, got {:?}", other),
    }
    let carried = parse(
        &rules,
        r#"L 10/25/2019 - 12:16:01: "von<16><[U:1:181030438]><Blue>" triggered "player_carryobject" (object "OBJ_SENTRYGUN") (position "1822 -616 2")"#,
    );
    assert!(matches!(carried.kind, EventKind::ObjectCarried { .. }));
    let dropped = parse(
        &rules,
        r#"L 10/25/2019 - 12:15:27: "Sedna<9><[U:1:160531776]><Red>" triggered "player_dropobject" (object "OBJ_SENTRYGUN") (position "1976 630 265")"#,
    );
    assert!(matches!(dropped.kind, EventKind::ObjectDropped { .. }));
    let killed = parse(
        &rules,
        r#"L 10/25/2019 - 12:19:36: "Kodyn<19><[U:1:439767837]><Blue>" triggered "killedobject" (object "OBJ_DISPENSER") (weapon "tf_projectile_rocket") (objectowner "Sedna<9><[U:1:160531776]><Red>") (attacker_position "-359 -111 528")"#,
    );
    match killed.kind {
        EventKind::ObjectKilled { object, owner, .. } => {
            assert_eq!(object, "OBJ_DISPENSER");
            assert_eq!(owner.name, "Sedna");
        }
        other => panic!("expected object kill, got {:?}", other),
    }
    let detonated = parse(
        &rules,
        r#"L 10/25/2019 - 12:20:53: "von<16><[U:1:181030438]><Blue>" triggered "object_detonated" (object "OBJ_TELEPORTER") (position "470 1326 576")"#,
    );
    assert!(matches!(detonated.kind, EventKind::ObjectDetonated { .. }));
}

#[test]
fn test_extinguished() {
    let rules = RuleSet::new();
    let event = parse(
        &rules,
        r#"L 07/11/2019 - 00:09:55: "wonder<7><[U:1:34284979]><Red>" triggered "player_extinguished" against "rad<6><[U:1:57823119]><Red>" with "tf_weapon_medigun" (attacker_position "1907 2554 611") (victim_position "1728 2457 576")"#,
    );
    assert!(matches!(event.kind, EventKind::Extinguished { .. }));
}

#[test]
fn test_capture_lines() {
    let rules = RuleSet::new();
    let blocked = parse(
        &rules,
        r##"L 07/11/2019 - 00:28:37: "Detoed<43><[U:1:93656154]><Blue>" triggered "captureblocked" (cp "0") (cpname "#koth_viaduct_cap") (position "-266 343 0")"##,
    );
    match blocked.kind {
        EventKind::CaptureBlocked { cp_name, .. } => assert_eq!(cp_name, "#koth_viaduct_cap"),
        other => panic!("expected capture blocked, got {:?}", other),
    }
    let captured = parse(
        &rules,
        r##"L 07/11/2019 - 00:38:41: Team "Blue" triggered "pointcaptured" (cp "0") (cpname "#koth_viaduct_cap") (numcappers "3") (player1 "AustinN<48><[U:1:167925837]><Blue>") (position1 "99 97 7") (player2 "STiNGHAN<51><[U:1:63723362]><Blue>") (position2 "-105 118 5") (player3 "FTH<54><[U:1:106022087]><Blue>") (position3 "-162 -125 0")"##,
    );
    match captured.kind {
        EventKind::PointCaptured {
            team,
            expected_cappers,
            cappers,
            ..
        } => {
            assert_eq!(team, Team::Blu);
            assert_eq!(expected_cappers, 3);
            assert_eq!(
                cappers,
                vec![
                    SteamId::parse("[U:1:167925837]"),
                    SteamId::parse("[U:1:63723362]"),
                    SteamId::parse("[U:1:106022087]"),
                ]
            );
        }
        other => panic!("expected point captured, got {:?}", other),
    }
}

#[test]
fn test_world_lines() {
    let rules = RuleSet::new();
    let start = parse(&rules, r#"L 07/11/2019 - 00:06:06: World triggered "Round_Start""#);
    assert!(matches!(start.kind, EventKind::RoundStart));
    let overtime = parse(
        &rules,
        r#"L 07/11/2019 - 00:11:00: World triggered "Round_Overtime""#,
    );
    assert!(matches!(overtime.kind, EventKind::RoundOvertime));
    let win = parse(
        &rules,
        r#"L 07/11/2019 - 00:11:28: World triggered "Round_Win" (winner "Red")"#,
    );
    match win.kind {
        EventKind::RoundWin { winner } => assert_eq!(winner, Team::Red),
        other => panic!("expected round win, got {:?}", other),
    }
    let length = parse(
        &rules,
        r#"L 07/11/2019 - 00:11:28: World triggered "Round_Length" (seconds "325.86")"#,
    );
    match length.kind {
        EventKind::RoundLength { seconds } => assert_eq!(seconds, 325.86),
        other => panic!("expected round length, got {:?}", other),
    }
    let over = parse(
        &rules,
        r#"L 07/11/2019 - 00:11:38: World triggered "Game_Over" reason "Reached Time Limit""#,
    );
    match over.kind {
        EventKind::GameOver { reason } => assert_eq!(reason, "Reached Time Limit"),
        other => panic!("expected game over, got {:?}", other),
    }
    let current = parse(
        &rules,
        r#"L 07/11/2019 - 00:11:28: Team "Red" current score "3" with "6" players"#,
    );
    match current.kind {
        EventKind::TeamScore { team, score } => {
            assert_eq!(team, Team::Red);
            assert_eq!(score, 3);
        }
        other => panic!("expected team score, got {:?}", other),
    }
    let final_score = parse(
        &rules,
        r#"L 07/11/2019 - 00:11:38: Team "Red" final score "3" with "6" players"#,
    );
    assert!(matches!(final_score.kind, EventKind::TeamFinalScore { .. }));
    let paused = parse(&rules, r#"L 10/27/2019 - 23:53:58: World triggered "Game_Paused""#);
    assert!(matches!(paused.kind, EventKind::Paused));
    let unpaused = parse(
        &rules,
        r#"L 10/27/2019 - 23:53:38: World triggered "Game_Unpaused""#,
    );
    assert!(matches!(unpaused.kind, EventKind::Unpaused));
}

#[test]
fn test_undefined_noise_is_skipped() {
    let rules = RuleSet::new();
    let lines = [
        r#"L 07/11/2019 - 00:26:29: "HLPugsTV<45><his possible><unknown>" changed role to "undefined""#,
        r#"L 07/11/2019 - 00:50:12: "AMP_T<64><[U:1:163893616]><unknown>" spawned as "undefined""#,
    ];
    for line in lines {
        assert_eq!(rules.parse_line(line), Parsed::Skipped, "line: {}", line);
    }
}

#[test]
fn test_unknown_line_is_unhandled() {
    let rules = RuleSet::new();
    assert_eq!(
        rules.parse_line("L 07/11/2019 - 00:26:29: something entirely new"),
        Parsed::Unhandled
    );
}

#[test]
fn test_timestamp_decoding() {
    use chrono::{Datelike, Timelike};
    let rules = RuleSet::new();
    let event = parse(&rules, r#"L 07/11/2019 - 00:06:06: World triggered "Round_Start""#);
    // Day first, then month
    assert_eq!(event.timestamp.day(), 7);
    assert_eq!(event.timestamp.month(), 11);
    assert_eq!(event.timestamp.year(), 2019);
    assert_eq!(event.timestamp.hour(), 0);
    assert_eq!(event.timestamp.minute(), 6);
    assert_eq!(event.timestamp.second(), 6);
}
