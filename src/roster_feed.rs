use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::espn_feed::EspnFeed;
use crate::league::{FeedFamily, League};
use crate::milb_feed::MilbFeed;
use crate::model::{ExternalRoster, TeamIdentity};
use crate::nhl_feed::NhlFeed;

/// Authoritative roster source for one league family.
pub trait RosterFeed: Send + Sync {
    fn name(&self) -> &'static str;
    fn fetch_roster(&self, team: &TeamIdentity, league: League) -> Result<ExternalRoster>;
}

/// Dispatches to the adapter serving the team's league.
pub struct FeedRouter {
    espn: EspnFeed,
    milb: MilbFeed,
    nhl: NhlFeed,
}

impl FeedRouter {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            espn: EspnFeed::new(timeout)?,
            milb: MilbFeed::new(timeout)?,
            nhl: NhlFeed::new(timeout)?,
        })
    }
}

impl RosterFeed for FeedRouter {
    fn name(&self) -> &'static str {
        "router"
    }

    fn fetch_roster(&self, team: &TeamIdentity, league: League) -> Result<ExternalRoster> {
        let feed: &dyn RosterFeed = match league.feed() {
            FeedFamily::Espn { .. } => &self.espn,
            FeedFamily::MlbStats { .. } => &self.milb,
            FeedFamily::Nhl => &self.nhl,
            FeedFamily::Unsupported => {
                debug!(league = league.code(), "no roster feed for league");
                return Ok(ExternalRoster::new());
            }
        };
        feed.fetch_roster(team, league)
    }
}

/// Feed that never has data; used when feeds are switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledFeed;

impl RosterFeed for DisabledFeed {
    fn name(&self) -> &'static str {
        "disabled"
    }

    fn fetch_roster(&self, _team: &TeamIdentity, _league: League) -> Result<ExternalRoster> {
        Ok(ExternalRoster::new())
    }
}

/// Fetch failures, timeouts and unknown teams all come back as an empty
/// roster; they only disable backfill for this run.
pub fn fetch_or_empty(feed: &dyn RosterFeed, team: &TeamIdentity) -> ExternalRoster {
    if team.is_unknown() {
        return ExternalRoster::new();
    }
    let Some(league) = team.league else {
        debug!(team = %team.name, "team has no league, skipping roster feed");
        return ExternalRoster::new();
    };
    match feed.fetch_roster(team, league) {
        Ok(roster) => {
            info!(
                feed = feed.name(),
                team = %team.name,
                league = league.code(),
                players = roster.len(),
                "fetched official roster"
            );
            roster
        }
        Err(err) => {
            warn!(
                feed = feed.name(),
                team = %team.name,
                league = league.code(),
                error = %format!("{err:#}"),
                "roster feed unavailable"
            );
            ExternalRoster::new()
        }
    }
}

pub(crate) fn pick_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .find_map(as_text)
}

/// Trimmed non-empty text from a string or number; `{ "default": .. }`
/// wrappers are unwrapped.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let t = s.trim();
            (!t.is_empty()).then(|| t.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("default").and_then(as_text),
        _ => None,
    }
}

pub(crate) fn as_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Empty or literal "null" bodies mean the feed had nothing for us.
pub(crate) fn parse_body(raw: &str, what: &str) -> Result<Option<Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let value = serde_json::from_str(trimmed).with_context(|| format!("invalid {what} json"))?;
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::ExternalRosterRecord;

    struct Failing;

    impl RosterFeed for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn fetch_roster(&self, _team: &TeamIdentity, _league: League) -> Result<ExternalRoster> {
            Err(anyhow::anyhow!("connection reset"))
        }
    }

    struct Fixed;

    impl RosterFeed for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn fetch_roster(&self, _team: &TeamIdentity, _league: League) -> Result<ExternalRoster> {
            Ok(crate::model::roster_from_records([ExternalRosterRecord::new("Pat Lee")]))
        }
    }

    #[test]
    fn errors_become_empty_rosters() {
        let team = TeamIdentity::unresolved("Boston Celtics", "Basketball", Some(League::Nba));
        assert!(fetch_or_empty(&Failing, &team).is_empty());
    }

    #[test]
    fn teams_without_league_are_skipped() {
        let team = TeamIdentity::unresolved("Springfield Isotopes", "Baseball", None);
        assert!(fetch_or_empty(&Fixed, &team).is_empty());
        let known = TeamIdentity::unresolved("Iowa Cubs", "Baseball", Some(League::TripleA));
        assert_eq!(fetch_or_empty(&Fixed, &known).len(), 1);
    }

    #[test]
    fn text_helpers_unwrap_numbers_and_defaults() {
        let v = json!({"a": " x ", "b": 7, "c": {"default": "Connor"}, "d": ""});
        assert_eq!(pick_string(&v, &["d", "a"]), Some("x".into()));
        assert_eq!(pick_string(&v, &["b"]), Some("7".into()));
        assert_eq!(pick_string(&v, &["c"]), Some("Connor".into()));
        assert_eq!(parse_body(" null ", "x").expect("ok"), None);
    }
}
