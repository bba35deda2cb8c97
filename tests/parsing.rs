use std::fs;
use std::path::PathBuf;

use roster_sync::espn_feed::{find_team_id, parse_espn_roster_json, parse_espn_teams_json};
use roster_sync::generative::parse_generation_response;
use roster_sync::league::League;
use roster_sync::milb_feed::{find_team_id as find_milb_team_id, parse_milb_roster_json, parse_milb_teams_json};
use roster_sync::model::{TeamIdentity, roster_from_records};
use roster_sync::nhl_feed::parse_nhl_roster_json;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_espn_teams_fixture() {
    let raw = read_fixture("espn_teams.json");
    let teams = parse_espn_teams_json(&raw).expect("fixture should parse");
    assert_eq!(teams.len(), 2, "team without id is skipped");
    assert_eq!(teams[1].id, "23");
    assert_eq!(teams[1].abbreviation.as_deref(), Some("SAC"));

    let kings = TeamIdentity::unresolved("Sacramento Kings", "Basketball", Some(League::Nba));
    assert_eq!(find_team_id(&teams, &kings).as_deref(), Some("23"));
    let nobody = TeamIdentity::unresolved("Springfield Isotopes", "Basketball", Some(League::Nba));
    assert_eq!(find_team_id(&teams, &nobody), None);
}

#[test]
fn parses_flat_espn_roster_fixture() {
    let raw = read_fixture("espn_roster_flat.json");
    let records = parse_espn_roster_json(&raw).expect("fixture should parse");
    assert_eq!(records.len(), 2, "nameless athlete is skipped");

    let fox = &records[0];
    assert_eq!(fox.name_key, "DEAARON FOX");
    assert_eq!(fox.display_name, "De'Aaron Fox");
    assert_eq!(fox.jersey.as_deref(), Some("5"));
    assert_eq!(fox.position.as_deref(), Some("PG"));
    assert_eq!(fox.external_id.as_deref(), Some("4066259"));
    assert_eq!(fox.weight_kg, Some(84));
    assert_eq!(fox.birth_date.as_deref(), Some("1997-12-20"));
    assert_eq!(fox.place_of_birth.as_deref(), Some("New Orleans, LA, USA"));
    assert!(fox.photo_url.as_deref().is_some_and(|u| u.ends_with("4066259.png")));

    assert_eq!(records[1].display_name, "Domantas Sabonis");
    assert_eq!(records[1].position.as_deref(), Some("C"));
}

#[test]
fn parses_grouped_espn_roster_fixture() {
    let raw = read_fixture("espn_roster_grouped.json");
    let roster = roster_from_records(parse_espn_roster_json(&raw).expect("fixture should parse"));
    assert_eq!(roster.len(), 3);
    assert_eq!(roster["JON SMITH"].jersey.as_deref(), Some("23"));
    assert_eq!(roster["PAT LEE"].position.as_deref(), Some("CB"));
    assert_eq!(roster["JOSE NUNEZ"].display_name, "José Núñez");
}

#[test]
fn parses_mlb_fixtures() {
    let teams = parse_milb_teams_json(&read_fixture("mlb_teams.json")).expect("teams parse");
    assert_eq!(teams.len(), 2);
    let iowa = TeamIdentity::unresolved("Iowa Cubs", "Baseball", Some(League::TripleA));
    assert_eq!(find_milb_team_id(&teams, &iowa), Some(451));
    let by_location = TeamIdentity::unresolved("Sacramento River Cats 2025", "Baseball", None);
    assert_eq!(find_milb_team_id(&teams, &by_location), Some(2310));

    let records = parse_milb_roster_json(&read_fixture("mlb_roster.json")).expect("roster parse");
    assert_eq!(records.len(), 2);
    let pca = &records[0];
    assert_eq!(pca.jersey.as_deref(), Some("52"));
    assert_eq!(pca.position.as_deref(), Some("CF"));
    assert_eq!(pca.height_cm, Some(183));
    assert_eq!(pca.weight_kg, Some(83));
    assert_eq!(pca.place_of_birth.as_deref(), Some("Sherman Oaks, USA"));
    assert!(pca.photo_url.as_deref().is_some_and(|u| u.contains("/682985/")));
    assert_eq!(records[1].jersey, None, "blank jersey is dropped");
}

#[test]
fn parses_nhl_roster_fixture() {
    let records = parse_nhl_roster_json(&read_fixture("nhl_roster.json")).expect("roster parse");
    assert_eq!(records.len(), 3);
    let kempe = &records[0];
    assert_eq!(kempe.display_name, "Adrian Kempe");
    assert_eq!(kempe.jersey.as_deref(), Some("9"));
    assert_eq!(kempe.position.as_deref(), Some("R"));
    assert_eq!(kempe.height_cm, Some(188));
    assert_eq!(kempe.place_of_birth.as_deref(), Some("Kramfors, SWE"));
    assert_eq!(records[2].name_key, "DARCY KUEMPER");
}

#[test]
fn empty_and_null_feed_bodies_are_empty_rosters() {
    assert!(parse_espn_roster_json("").expect("empty").is_empty());
    assert!(parse_nhl_roster_json("null").expect("null").is_empty());
    assert!(parse_milb_roster_json("  ").expect("blank").is_empty());
    assert!(parse_espn_roster_json("<html>").is_err());
}

#[test]
fn parses_grounded_generation_response() {
    let raw = r#"{
        "candidates": [{
            "content": { "parts": [{ "text": "{\"teamName\":" }, { "text": " \"Unknown Team\"}" }] },
            "finishReason": "STOP",
            "groundingMetadata": {
                "webSearchQueries": ["kings colors", "kings logo"],
                "groundingChunks": [
                    { "web": { "uri": "https://example.org/kings", "title": "Kings" } },
                    { "web": { "uri": "https://example.org/untitled" } }
                ]
            }
        }],
        "usageMetadata": { "promptTokenCount": 1200, "candidatesTokenCount": 300 }
    }"#;
    let response = parse_generation_response(raw).expect("response parses");
    assert_eq!(response.text, "{\"teamName\": \"Unknown Team\"}");
    assert_eq!(response.search_queries, 2);
    assert_eq!(response.sources.len(), 2);
    assert_eq!(response.sources[1].title, "Source");
    assert_eq!(response.input_tokens, Some(1200));
    assert_eq!(response.output_tokens, Some(300));
}
