use std::time::Duration;

use anyhow::Result;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::http_client::{client_for, fetch_text};
use crate::league::League;
use crate::model::{ExternalRoster, ExternalRosterRecord, TeamIdentity, roster_from_records};
use crate::normalize::team_key;
use crate::registry_data::NHL;
use crate::roster_feed::{RosterFeed, as_f64, parse_body, pick_string};

const BASE_URL: &str = "https://api-web.nhle.com/v1";
const ROSTER_GROUPS: [&str; 3] = ["forwards", "defensemen", "goalies"];

/// NHL web API, keyed by three-letter team code.
pub struct NhlFeed {
    client: Client,
}

impl NhlFeed {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: client_for(timeout)?,
        })
    }
}

impl RosterFeed for NhlFeed {
    fn name(&self) -> &'static str {
        "nhl"
    }

    fn fetch_roster(&self, team: &TeamIdentity, _league: League) -> Result<ExternalRoster> {
        let Some(code) = tri_code(team) else {
            debug!(team = %team.name, "no nhl tri-code for team");
            return Ok(ExternalRoster::new());
        };
        let url = format!("{BASE_URL}/roster/{code}/current");
        let records = parse_nhl_roster_json(&fetch_text(&self.client, &url)?)?;
        Ok(roster_from_records(records))
    }
}

/// Feed code for a team: its own three-letter code when it has one, else a
/// lookup of the name (or alias) in the NHL table.
pub fn tri_code(team: &TeamIdentity) -> Option<String> {
    let own = team
        .feed_id
        .as_deref()
        .or(team.abbreviation.as_deref())
        .map(str::trim)
        .filter(|c| c.len() == 3 && c.chars().all(|ch| ch.is_ascii_alphabetic()));
    if let Some(code) = own {
        return Some(code.to_ascii_uppercase());
    }
    let wanted = team_key(&team.name);
    NHL.iter()
        .find(|row| {
            team_key(row.name) == wanted || row.aliases.iter().any(|a| team_key(a) == wanted)
        })
        .map(|row| row.code.to_string())
}

pub fn parse_nhl_roster_json(raw: &str) -> Result<Vec<ExternalRosterRecord>> {
    let Some(root) = parse_body(raw, "nhl roster")? else {
        return Ok(Vec::new());
    };
    let records = ROSTER_GROUPS
        .iter()
        .filter_map(|group| root.get(*group).and_then(Value::as_array))
        .flatten()
        .filter_map(parse_player)
        .collect();
    Ok(records)
}

fn parse_player(value: &Value) -> Option<ExternalRosterRecord> {
    let first = pick_string(value, &["firstName"])?;
    let last = pick_string(value, &["lastName"])?;
    let mut record = ExternalRosterRecord::new(&format!("{first} {last}"));
    record.jersey = pick_string(value, &["sweaterNumber"]);
    record.position = pick_string(value, &["positionCode"]);
    record.photo_url = pick_string(value, &["headshot"]);
    record.external_id = pick_string(value, &["id"]);
    record.height_cm = as_f64(value.get("heightInCentimeters")).map(|h| h.round() as u16);
    record.weight_kg = as_f64(value.get("weightInKilograms")).map(|w| w.round() as u16);
    record.birth_date = pick_string(value, &["birthDate"]);
    record.place_of_birth = match (
        pick_string(value, &["birthCity"]),
        pick_string(value, &["birthCountry"]),
    ) {
        (Some(city), Some(country)) => Some(format!("{city}, {country}")),
        (city, country) => city.or(country),
    };
    Some(record)
}
