use logstf_stats::classifier::decode::{
    parse_health_pack, parse_medigun, parse_params, parse_player_class, parse_pos, parse_team,
    HealthPack, Medigun, PlayerClass, Position, SteamId, Team,
};
use pretty_assertions::assert_eq;

#[test]
fn test_steam_id_sid3() {
    assert_eq!(SteamId::parse("[U:1:57823119]").as_u64(), 76561198018088847);
}

#[test]
fn test_steam_id_legacy_form() {
    // STEAM_X:Y:Z resolves to account id z*2+y
    let legacy = SteamId::parse("STEAM_0:1:22649331");
    let sid3 = SteamId::parse("[U:1:45298663]");
    assert_eq!(legacy, sid3);
    assert!(legacy.is_valid());
}

#[test]
fn test_steam_id_placeholders_are_invalid() {
    for raw in ["", "BOT", "Console", "[U:1:0]", "STEAM_ID_PENDING"] {
        let id = SteamId::parse(raw);
        assert_eq!(id, SteamId::INVALID, "raw: {:?}", raw);
        assert!(!id.is_valid());
    }
}

#[test]
fn test_team_names() {
    assert_eq!(parse_team("Red"), Team::Red);
    assert_eq!(parse_team("Blue"), Team::Blu);
    assert_eq!(parse_team("Spectator"), Team::Spec);
    assert_eq!(parse_team("Unassigned"), Team::Spec);
    assert_eq!(parse_team(""), Team::Spec);
}

#[test]
fn test_player_class_names() {
    assert_eq!(parse_player_class("demoman"), PlayerClass::Demo);
    assert_eq!(parse_player_class("heavyweapons"), PlayerClass::Heavy);
    assert_eq!(parse_player_class("Medic"), PlayerClass::Medic);
    assert_eq!(parse_player_class("undefined"), PlayerClass::Spectator);
}

#[test]
fn test_medigun_names() {
    assert_eq!(parse_medigun("medigun"), Medigun::Uber);
    assert_eq!(parse_medigun("kritzkrieg"), Medigun::Kritzkrieg);
    assert_eq!(parse_medigun("vaccinator"), Medigun::Vaccinator);
    assert_eq!(parse_medigun("quickfix"), Medigun::QuickFix);
}

#[test]
fn test_health_pack_names() {
    assert_eq!(parse_health_pack("medkit_small"), HealthPack::Small);
    assert_eq!(parse_health_pack("medkit_medium"), HealthPack::Medium);
    assert_eq!(parse_health_pack("medkit_full"), HealthPack::Full);
}

#[test]
fn test_position_triple() {
    assert_eq!(
        parse_pos("1 2 -3"),
        Position { x: 1, y: 2, z: -3 }
    );
    // Bad components fall back to zero without failing the event
    assert_eq!(
        parse_pos("x 2"),
        Position { x: 0, y: 2, z: 0 }
    );
}

#[test]
fn test_params_tokenised_without_punctuation() {
    let params = parse_params(r#"(damage "88") (realdamage "32") (weapon "ubersaw")"#);
    assert_eq!(
        params,
        vec!["damage", "88", "realdamage", "32", "weapon", "ubersaw"]
    );
}
