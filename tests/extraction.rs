use std::fs;
use std::path::PathBuf;

use serde_json::{Value, json};

use hb_ingest::IngestError;
use hb_ingest::document::{GameDocument, parse_game_document};
use hb_ingest::extract::extract_game;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn fixture_value() -> Value {
    serde_json::from_str(&read_fixture("combined_game.json")).expect("fixture should be valid json")
}

fn doc_from_value(value: Value) -> GameDocument {
    serde_json::from_value(value).expect("fixture variant should deserialize")
}

#[test]
fn extracts_full_game_fixture() {
    let doc = parse_game_document(&read_fixture("combined_game.json")).expect("fixture parses");
    let extracted = extract_game(&doc, "7504381").expect("fixture extracts");

    assert_eq!(extracted.match_id, "handball4all.westfalen.7504381");

    let league = extracted.league.as_ref().expect("league present");
    assert_eq!(league.league_id, "handball4all.westfalen.fkl-1_2024_2025");
    assert_eq!(league.season, "2024/2025");
    assert_eq!(league.name, "Frauen-Kreisliga (2024/2025)");

    assert_eq!(extracted.teams.len(), 2);
    let hall = extracted.hall.as_ref().expect("hall present");
    assert_eq!(hall.hall_id, "handball4all.westfalen.h-77");
    assert_eq!(hall.city.as_deref(), Some("Münster"));

    // 5 roster players + 2 officials; officials carry no roster stats.
    assert_eq!(extracted.players.len(), 7);
    assert_eq!(extracted.roster_stats.len(), 5);
    assert_eq!(
        extracted.players.iter().filter(|p| p.is_official).count(),
        2
    );

    let placeholder = extracted
        .players
        .iter()
        .find(|p| p.player_id == "handball4all.westfalen.p-3")
        .expect("placeholder player registered");
    assert!(placeholder.is_placeholder);
    assert!(!placeholder.is_official);

    let header = &extracted.header;
    assert_eq!(header.league_id.as_deref(), Some("handball4all.westfalen.fkl-1_2024_2025"));
    assert_eq!(header.starts_at, 1726315200);
    assert_eq!(header.status.as_deref(), Some("Post"));
    assert_eq!(header.game_number, Some(710312));

    assert_eq!(extracted.events.len(), 8);
}

#[test]
fn resolves_event_references_through_jersey_map() {
    let doc = parse_game_document(&read_fixture("combined_game.json")).expect("fixture parses");
    let extracted = extract_game(&doc, "7504381").expect("fixture extracts");

    let by_id = |id: i64| {
        extracted
            .events
            .iter()
            .find(|e| e.source_event_id == id)
            .expect("event present")
    };

    // "Tor durch 7." on the home side is Anna Schmidt.
    assert_eq!(
        by_id(9002).ref_player_id.as_deref(),
        Some("handball4all.westfalen.p-1")
    );
    // Parenthesized number on the away side.
    assert_eq!(
        by_id(9003).ref_player_id.as_deref(),
        Some("handball4all.westfalen.p-4")
    );
    assert_eq!(
        by_id(9007).ref_player_id.as_deref(),
        Some("handball4all.westfalen.p-2")
    );
    // Sentinel messages carry no side, so no reference.
    assert_eq!(by_id(9005).ref_player_id, None);
}

#[test]
fn two_minute_penalties_come_from_events_not_roster() {
    let doc = parse_game_document(&read_fixture("combined_game.json")).expect("fixture parses");
    let extracted = extract_game(&doc, "7504381").expect("fixture extracts");

    let stat_of = |player_id: &str| {
        extracted
            .roster_stats
            .iter()
            .find(|s| s.player_id == player_id)
            .expect("roster entry present")
    };

    assert_eq!(stat_of("handball4all.westfalen.p-1").two_minute_penalties, 2);
    assert_eq!(stat_of("handball4all.westfalen.p-4").two_minute_penalties, 1);
    assert_eq!(stat_of("handball4all.westfalen.p-2").two_minute_penalties, 0);
    assert_eq!(stat_of("handball4all.westfalen.p-1").goals, 9);
    assert_eq!(stat_of("handball4all.westfalen.p-1").seven_meter_goals, 3);
}

#[test]
fn scores_and_points_from_event_sentinels() {
    let doc = parse_game_document(&read_fixture("combined_game.json")).expect("fixture parses");
    let extracted = extract_game(&doc, "7504381").expect("fixture extracts");

    let result = &extracted.result;
    assert_eq!((result.home_goals, result.away_goals), (27, 25));
    assert_eq!(
        (result.home_goals_half, result.away_goals_half),
        (Some(15), Some(12))
    );
    assert_eq!((result.home_points, result.away_points), (Some(2), Some(0)));
}

#[test]
fn home_walkover_overrides_event_scores() {
    let mut value = fixture_value();
    value["data"]["summary"]["extraStates"] = json!(["WoHome"]);
    let extracted = extract_game(&doc_from_value(value), "7504381").expect("extracts");

    let result = &extracted.result;
    assert_eq!((result.home_goals, result.away_goals), (0, 0));
    assert_eq!((result.home_goals_half, result.away_goals_half), (None, None));
    assert_eq!((result.home_points, result.away_points), (Some(0), Some(2)));
}

#[test]
fn points_fall_back_to_summary_goal_totals() {
    let mut value = fixture_value();
    value["data"]["events"] = json!([]);
    value["data"]["summary"]["homeGoals"] = json!(25);
    value["data"]["summary"]["awayGoals"] = json!(20);
    let extracted = extract_game(&doc_from_value(value), "7504381").expect("extracts");

    let result = &extracted.result;
    assert_eq!((result.home_goals, result.away_goals), (25, 20));
    assert_eq!((result.home_goals_half, result.away_goals_half), (None, None));
    assert_eq!((result.home_points, result.away_points), (Some(2), Some(0)));
}

#[test]
fn missing_summary_fails_the_single_game() {
    let mut value = fixture_value();
    value["data"]
        .as_object_mut()
        .expect("data object")
        .remove("summary");
    let err = extract_game(&doc_from_value(value), "7504381").expect_err("must fail");
    assert!(matches!(err, IngestError::MissingData { .. }));
}

#[test]
fn missing_home_team_id_fails_the_single_game() {
    let mut value = fixture_value();
    value["data"]["summary"]["homeTeam"]
        .as_object_mut()
        .expect("home team object")
        .remove("id");
    let err = extract_game(&doc_from_value(value), "7504381").expect_err("must fail");
    assert!(matches!(
        err,
        IngestError::MissingData {
            what: "home team id",
            ..
        }
    ));
}

#[test]
fn game_without_tournament_extracts_without_league() {
    let mut value = fixture_value();
    value["data"]["summary"]
        .as_object_mut()
        .expect("summary object")
        .remove("tournament");
    let extracted = extract_game(&doc_from_value(value), "7504381").expect("extracts");
    assert!(extracted.league.is_none());
    assert_eq!(extracted.header.league_id, None);
}

#[test]
fn season_already_in_name_is_not_annotated_twice() {
    let mut value = fixture_value();
    value["data"]["summary"]["tournament"]["name"] = json!("Frauen-Kreisliga 2024/2025");
    let extracted = extract_game(&doc_from_value(value), "7504381").expect("extracts");
    assert_eq!(
        extracted.league.expect("league present").name,
        "Frauen-Kreisliga 2024/2025"
    );

    let mut value = fixture_value();
    value["data"]["summary"]["tournament"]["name"] = json!("Kreisliga Saison 2024");
    let extracted = extract_game(&doc_from_value(value), "7504381").expect("extracts");
    assert_eq!(
        extracted.league.expect("league present").name,
        "Kreisliga Saison 2024"
    );
}
