use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};

use roster_sync::config::EngineConfig;
use roster_sync::engine::{ExtractionRequest, RosterEngine};
use roster_sync::error::ExtractionError;
use roster_sync::generative::{GenerationRequest, GenerationResponse, GenerativeClient};
use roster_sync::league::League;
use roster_sync::model::{
    BrandingSource, ExtractionMode, ExternalRoster, ExternalRosterRecord, TeamIdentity,
    UNKNOWN_NOC, UNKNOWN_TEAM, roster_from_records,
};
use roster_sync::normalize::team_key;
use roster_sync::registry::TeamRegistry;
use roster_sync::roster_feed::RosterFeed;
use roster_sync::store::{NullStore, PersistedStore, SqliteStore};
use roster_sync::tier::SubscriptionTier;

#[derive(Clone, Default)]
struct ScriptedClient {
    replies: Arc<Mutex<Vec<Result<GenerationResponse>>>>,
    seen: Arc<Mutex<Vec<GenerationRequest>>>,
}

impl ScriptedClient {
    fn replying(texts: &[&str]) -> Self {
        let replies = texts
            .iter()
            .rev()
            .map(|t| {
                Ok(GenerationResponse {
                    text: t.to_string(),
                    input_tokens: Some(1_000),
                    output_tokens: Some(200),
                    ..GenerationResponse::default()
                })
            })
            .collect();
        Self {
            replies: Arc::new(Mutex::new(replies)),
            seen: Arc::default(),
        }
    }

    fn calls(&self) -> usize {
        self.seen.lock().expect("lock").len()
    }
}

impl GenerativeClient for ScriptedClient {
    fn model_name(&self) -> &str {
        "gemini-2.0-flash"
    }

    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        self.seen.lock().expect("lock").push(request.clone());
        self.replies
            .lock()
            .expect("lock")
            .pop()
            .unwrap_or_else(|| Err(anyhow!("no scripted reply left")))
    }
}

struct FailingFeed;

impl RosterFeed for FailingFeed {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn fetch_roster(&self, _team: &TeamIdentity, _league: League) -> Result<ExternalRoster> {
        Err(anyhow!("connection reset by peer"))
    }
}

struct StaticFeed(ExternalRoster);

impl RosterFeed for StaticFeed {
    fn name(&self) -> &'static str {
        "static"
    }

    fn fetch_roster(&self, _team: &TeamIdentity, _league: League) -> Result<ExternalRoster> {
        Ok(self.0.clone())
    }
}

/// Forwards to a shared SQLite store so the test can inspect it afterwards.
struct SharedStore(Arc<SqliteStore>);

impl PersistedStore for SharedStore {
    fn branding(&self, team_key: &str, sport: &str) -> Result<Option<roster_sync::store::BrandingRow>> {
        self.0.branding(team_key, sport)
    }

    fn upsert_branding(&self, row: &roster_sync::store::BrandingRow) -> Result<()> {
        self.0.upsert_branding(row)
    }

    fn alias(&self, alias_key: &str) -> Result<Option<roster_sync::model::TeamCandidate>> {
        self.0.alias(alias_key)
    }

    fn upsert_alias(&self, alias_key: &str, team: &roster_sync::model::TeamCandidate) -> Result<()> {
        self.0.upsert_alias(alias_key, team)
    }

    fn record_usage(&self, event: &roster_sync::usage::UsageEvent) -> Result<()> {
        self.0.record_usage(event)
    }
}

fn engine(client: &ScriptedClient, store: Box<dyn PersistedStore>, feed: Box<dyn RosterFeed>) -> RosterEngine {
    RosterEngine::new(
        EngineConfig::default(),
        Some(Box::new(client.clone())),
        TeamRegistry::builtin(),
        store,
        feed,
    )
}

fn request(text: &str) -> ExtractionRequest {
    ExtractionRequest {
        text: text.to_string(),
        season_override: Some("2025".to_string()),
        ..ExtractionRequest::default()
    }
}

#[test]
fn unlabelled_paste_keeps_unknown_team_and_pads_jerseys() {
    let client = ScriptedClient::replying(&[r#"{
        "teamName": "Unknown Team",
        "athletes": [
            {"fullName": "SMITH", "jerseyNumber": "7"},
            {"fullName": "JONES"}
        ]
    }"#]);
    let engine = engine(&client, Box::new(NullStore), Box::new(FailingFeed));

    let result = engine.process(&request("SMITH07\nJONES\n")).expect("extraction succeeds");
    assert_eq!(result.team_name, UNKNOWN_TEAM);
    assert_eq!(result.athletes.len(), 2);
    assert_eq!(result.athletes[0].jersey_number, "07");
    assert_eq!(result.athletes[1].jersey_number, "00");
    assert_eq!(result.official_roster_count, 0);
    assert!(result.candidates.is_none());
    let branding = result.branding.expect("default branding");
    assert_eq!(branding.source, BrandingSource::Default);
    assert_eq!(client.calls(), 1);
}

#[test]
fn feed_failure_leaves_roster_untouched() {
    let client = ScriptedClient::replying(&[r#"{
        "teamName": "Boston Celtics",
        "sport": "Basketball",
        "athletes": [{"fullName": "Jayson Tatum", "position": "F"}]
    }"#]);
    let engine = engine(&client, Box::new(NullStore), Box::new(FailingFeed));

    let result = engine.process(&request("Jayson Tatum F")).expect("feed errors are not fatal");
    assert_eq!(result.team_name, "Boston Celtics");
    assert_eq!(result.league, Some(League::Nba));
    assert_eq!(result.official_roster_count, 0);
    assert_eq!(result.matched_count, 0);
    assert!(result.missing_athletes.is_empty());
    assert_eq!(result.athletes[0].full_name, "Jayson Tatum");
    assert_eq!(result.athletes[0].jersey_number, "00");
    assert_eq!(
        result.branding.map(|b| b.source),
        Some(BrandingSource::Registry)
    );
}

#[test]
fn official_roster_backfills_and_reports_missing_players() {
    let mut smith = ExternalRosterRecord::new("Jon Smith");
    smith.jersey = Some("23".into());
    smith.position = Some("WR".into());
    let mut lee = ExternalRosterRecord::new("Pat Lee");
    lee.jersey = Some("5".into());
    let feed = StaticFeed(roster_from_records([smith, lee]));

    let client = ScriptedClient::replying(&[
        r#"{"teamName": "Kansas City Chiefs", "athletes": [{"fullName": "JON SMITH"}]}"#,
        r#"{"guides": [
            {"name": "Jon Smith", "phoneticSimplified": "JON SMITH"},
            {"name": "Pat Lee", "phoneticSimplified": "PAT LEE"}
        ]}"#,
    ]);
    let engine = engine(&client, Box::new(NullStore), Box::new(feed));
    let mut req = request("JON SMITH");
    req.tier = SubscriptionTier::Studio;

    let result = engine.process(&req).expect("process");
    assert_eq!(result.athletes[0].full_name, "Jon Smith");
    assert_eq!(result.athletes[0].jersey_number, "23");
    assert_eq!(result.athletes[0].position, "WR");
    assert_eq!(result.official_roster_count, 2);
    assert_eq!(result.matched_count, 1);
    assert_eq!(result.missing_athletes.len(), 1);
    assert_eq!(result.missing_athletes[0].full_name, "Pat Lee");
    assert_eq!(result.missing_athletes[0].phonetic_simplified.as_deref(), Some("PAT LEE"));
    assert_eq!(client.calls(), 2, "one extraction call plus one batched phonetic call");
}

#[test]
fn ambiguous_team_returns_candidates_with_provisional_pick() {
    let client = ScriptedClient::replying(&[
        r#"{"teamName": "Kings 2025", "athletes": [{"fullName": "A B"}]}"#,
    ]);
    let engine = engine(&client, Box::new(NullStore), Box::new(FailingFeed));

    let result = engine.process(&request("A B")).expect("process");
    let candidates = result.candidates.expect("ambiguity surfaced");
    assert!(candidates.len() >= 2);
    assert_eq!(result.team_name, candidates[0].name);
}

#[test]
fn parse_failure_after_retry_is_surfaced_with_preview() {
    let client = ScriptedClient::replying(&["I could not find a roster.", "still not json"]);
    let engine = engine(&client, Box::new(NullStore), Box::new(FailingFeed));

    let err = engine.process(&request("SMITH 07")).expect_err("no roster salvageable");
    match err {
        ExtractionError::Parse { preview } => assert!(preview.contains("still not json")),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(client.calls(), 2);
}

#[test]
fn missing_api_key_is_reported() {
    let engine = RosterEngine::new(
        EngineConfig::default(),
        None,
        TeamRegistry::builtin(),
        Box::new(NullStore),
        Box::new(FailingFeed),
    );
    assert!(matches!(
        engine.process(&request("SMITH 07")),
        Err(ExtractionError::NotConfigured(_))
    ));
}

#[test]
fn usage_discovered_branding_and_confirmed_alias_are_persisted() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("in-memory db"));
    let client = ScriptedClient::replying(&[r##"{
        "teamName": "Springfield Isotopes",
        "sport": "Baseball",
        "primaryColor": "#0a3161",
        "secondaryColor": "#B31942",
        "athletes": [{"fullName": "Homer Simpson", "jerseyNumber": "8"}]
    }"##]);
    let engine = engine(&client, Box::new(SharedStore(store.clone())), Box::new(FailingFeed));
    let mut req = request("Homer Simpson 8");
    req.find_branding = true;
    req.user_id = Some("user-1".into());

    let result = engine.process(&req).expect("process");
    let branding = result.branding.expect("branding");
    assert_eq!(branding.source, BrandingSource::Discovered);
    assert_eq!(branding.primary_color, "#0A3161");

    let row = store
        .branding(&team_key("Springfield Isotopes"), "baseball")
        .expect("query")
        .expect("written through");
    assert_eq!(row.secondary_hex, "#B31942");
    assert_eq!(row.primary_rgb.as_deref(), Some("10, 49, 97"));

    let usage = store.usage_rows("user-1").expect("usage rows");
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].operation, "ROSTER_IMPORT");
    assert_eq!(usage[0].input_tokens, 1_000);

    // the caller confirms the guessed name actually meant a registry team
    let client = ScriptedClient::replying(&[
        r#"{"teamName": "Celts", "athletes": [{"fullName": "Jayson Tatum"}]}"#,
    ]);
    let engine = engine_with(&client, store.clone());
    let mut req = request("Jayson Tatum");
    req.manual_team = Some("Boston Celtics".into());
    let result = engine.process(&req).expect("process");
    assert_eq!(result.team_name, "Boston Celtics");
    let alias = store.alias("CELTS").expect("query").expect("alias stored");
    assert_eq!(alias.name, "Boston Celtics");
}

fn engine_with(client: &ScriptedClient, store: Arc<SqliteStore>) -> RosterEngine {
    engine(client, Box::new(SharedStore(store)), Box::new(FailingFeed))
}

#[test]
fn confirming_a_team_never_aliases_the_unknown_labels() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("in-memory db"));
    for label in [UNKNOWN_TEAM, UNKNOWN_NOC, "unknown team"] {
        let reply = format!(r#"{{"teamName": "{label}", "athletes": [{{"fullName": "Jayson Tatum"}}]}}"#);
        let client = ScriptedClient::replying(&[reply.as_str()]);
        let mut req = request("Jayson Tatum");
        req.manual_team = Some("Boston Celtics".into());
        let result = engine_with(&client, store.clone()).process(&req).expect("process");
        assert_eq!(result.team_name, "Boston Celtics");
        assert_eq!(store.alias(&team_key(label)).expect("query"), None, "{label} stored as alias");
    }

    // a later unlabelled NOC paste must not inherit the confirmed team
    let client = ScriptedClient::replying(&[
        r#"{"teamName": "Unknown Team", "athletes": [{"fullName": "Jayson Tatum"}]}"#,
    ]);
    let mut req = request("Jayson Tatum");
    req.mode = ExtractionMode::Noc;
    let result = engine_with(&client, store.clone()).process(&req).expect("process");
    assert_ne!(result.team_name, "Boston Celtics");
}

#[test]
fn failed_extraction_still_records_spent_tokens() {
    let store = Arc::new(SqliteStore::open_in_memory().expect("in-memory db"));
    let client = ScriptedClient::replying(&["no roster here", "still not json"]);
    let mut req = request("SMITH 07");
    req.user_id = Some("user-9".into());

    let err = engine_with(&client, store.clone()).process(&req).expect_err("unparsable");
    assert!(matches!(err, ExtractionError::Parse { .. }));
    assert_eq!(client.calls(), 2);

    let usage = store.usage_rows("user-9").expect("usage rows");
    assert_eq!(usage.len(), 1);
    assert_eq!(usage[0].operation, "ROSTER_IMPORT");
    assert_eq!(usage[0].input_tokens, 2_000);
    assert_eq!(usage[0].output_tokens, 400);
}
