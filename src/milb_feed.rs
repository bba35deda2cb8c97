use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::http_client::{client_for, fetch_text};
use crate::league::{FeedFamily, League};
use crate::model::{ExternalRoster, ExternalRosterRecord, TeamIdentity, roster_from_records};
use crate::normalize::team_key;
use crate::roster_feed::{RosterFeed, parse_body};

const BASE_URL: &str = "https://statsapi.mlb.com/api/v1";
const PHOTO_URL: &str = "https://img.mlbstatic.com/mlb-photos/image/upload/w_213,q_auto:best/v1/people";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MilbTeam {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub location_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamsResponse {
    #[serde(default)]
    teams: Vec<MilbTeam>,
}

#[derive(Debug, Deserialize)]
struct RosterResponse {
    #[serde(default)]
    roster: Vec<RosterEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterEntry {
    person: Person,
    #[serde(default)]
    jersey_number: Option<String>,
    #[serde(default)]
    position: Option<Position>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Person {
    id: u64,
    full_name: String,
    #[serde(default)]
    height: Option<String>,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    birth_date: Option<String>,
    #[serde(default)]
    birth_city: Option<String>,
    #[serde(default)]
    birth_country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Position {
    #[serde(default)]
    abbreviation: Option<String>,
}

/// MLB Stats API for the affiliated minor leagues (sportId per level).
pub struct MilbFeed {
    client: Client,
}

impl MilbFeed {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: client_for(timeout)?,
        })
    }
}

impl RosterFeed for MilbFeed {
    fn name(&self) -> &'static str {
        "mlb-stats"
    }

    fn fetch_roster(&self, team: &TeamIdentity, league: League) -> Result<ExternalRoster> {
        let FeedFamily::MlbStats { sport_id } = league.feed() else {
            return Err(anyhow!("{} is not served by the mlb stats api", league.code()));
        };
        let season = Utc::now().year();
        let teams_url = format!("{BASE_URL}/teams?sportId={sport_id}&season={season}");
        let teams = parse_milb_teams_json(&fetch_text(&self.client, &teams_url)?)?;
        let Some(team_id) = find_team_id(&teams, team) else {
            return Ok(ExternalRoster::new());
        };

        let roster_url =
            format!("{BASE_URL}/teams/{team_id}/roster?rosterType=active&hydrate=person");
        let records = parse_milb_roster_json(&fetch_text(&self.client, &roster_url)?)?;
        Ok(roster_from_records(records))
    }
}

pub fn parse_milb_teams_json(raw: &str) -> Result<Vec<MilbTeam>> {
    let Some(value) = parse_body(raw, "mlb teams")? else {
        return Ok(Vec::new());
    };
    let parsed: TeamsResponse = serde_json::from_value(value).context("invalid mlb teams json")?;
    Ok(parsed.teams)
}

pub fn find_team_id(teams: &[MilbTeam], team: &TeamIdentity) -> Option<u64> {
    let wanted = team_key(&team.name);
    let code = team.abbreviation.as_deref().or(team.feed_id.as_deref());
    teams
        .iter()
        .find(|t| team_key(&t.name) == wanted)
        .or_else(|| {
            // "Iowa Cubs" vs location + club name
            teams.iter().find(|t| match (&t.location_name, &t.team_name) {
                (Some(loc), Some(club)) => team_key(&format!("{loc} {club}")) == wanted,
                _ => false,
            })
        })
        .or_else(|| {
            let code = code?;
            teams.iter().find(|t| {
                t.abbreviation
                    .as_deref()
                    .is_some_and(|a| a.eq_ignore_ascii_case(code))
            })
        })
        .map(|t| t.id)
}

pub fn parse_milb_roster_json(raw: &str) -> Result<Vec<ExternalRosterRecord>> {
    let Some(value) = parse_body(raw, "mlb roster")? else {
        return Ok(Vec::new());
    };
    let parsed: RosterResponse =
        serde_json::from_value(value).context("invalid mlb roster json")?;
    Ok(parsed
        .roster
        .into_iter()
        .filter(|entry| !entry.person.full_name.trim().is_empty())
        .map(|entry| {
            let person = entry.person;
            let mut record = ExternalRosterRecord::new(&person.full_name);
            record.jersey = entry.jersey_number.filter(|j| !j.trim().is_empty());
            record.position = entry.position.and_then(|p| p.abbreviation);
            record.photo_url = Some(format!("{PHOTO_URL}/{}/headshot/milb/current", person.id));
            record.external_id = Some(person.id.to_string());
            record.height_cm = person.height.as_deref().and_then(feet_inches_to_cm);
            record.weight_kg = person
                .weight
                .filter(|w| *w > 0.0)
                .map(|lbs| (lbs * 0.453_592).round() as u16);
            record.birth_date = person.birth_date;
            record.place_of_birth = match (person.birth_city, person.birth_country) {
                (Some(city), Some(country)) => Some(format!("{city}, {country}")),
                (city, country) => city.or(country),
            };
            record
        })
        .collect())
}

/// Parses `6' 2"` style heights.
fn feet_inches_to_cm(raw: &str) -> Option<u16> {
    let (feet, rest) = raw.split_once('\'')?;
    let feet: f64 = feet.trim().parse().ok()?;
    let inches: f64 = rest.trim().trim_end_matches('"').trim().parse().unwrap_or(0.0);
    let cm = (feet * 12.0 + inches) * 2.54;
    (cm > 0.0).then(|| cm.round() as u16)
}
