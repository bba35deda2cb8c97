use std::time::Duration;

use anyhow::{Result, anyhow};
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::http_client::{client_for, fetch_text};
use crate::league::{FeedFamily, League};
use crate::model::{ExternalRoster, ExternalRosterRecord, TeamIdentity, roster_from_records};
use crate::normalize::{normalize_name, team_key};
use crate::roster_feed::{RosterFeed, as_f64, as_text, parse_body, pick_string};

const BASE_URL: &str = "https://site.api.espn.com/apis/site/v2/sports";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EspnTeam {
    pub id: String,
    pub abbreviation: Option<String>,
    pub display_name: String,
    pub short_name: Option<String>,
    pub nickname: Option<String>,
}

/// ESPN site API: team list for id lookup, then the team roster.
pub struct EspnFeed {
    client: Client,
}

impl EspnFeed {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: client_for(timeout)?,
        })
    }
}

impl RosterFeed for EspnFeed {
    fn name(&self) -> &'static str {
        "espn"
    }

    fn fetch_roster(&self, team: &TeamIdentity, league: League) -> Result<ExternalRoster> {
        let FeedFamily::Espn { sport, league: slug } = league.feed() else {
            return Err(anyhow!("{} is not served by espn", league.code()));
        };

        let teams_url = format!("{BASE_URL}/{sport}/{slug}/teams?limit=1000");
        let teams = parse_espn_teams_json(&fetch_text(&self.client, &teams_url)?)?;
        let Some(team_id) = find_team_id(&teams, team) else {
            debug!(team = %team.name, league = league.code(), "team not listed by espn");
            return Ok(ExternalRoster::new());
        };

        let roster_url = format!("{BASE_URL}/{sport}/{slug}/teams/{team_id}/roster");
        let records = parse_espn_roster_json(&fetch_text(&self.client, &roster_url)?)?;
        Ok(roster_from_records(records))
    }
}

pub fn parse_espn_teams_json(raw: &str) -> Result<Vec<EspnTeam>> {
    let Some(root) = parse_body(raw, "espn teams")? else {
        return Ok(Vec::new());
    };
    let teams = root
        .pointer("/sports/0/leagues/0/teams")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    let team = item.get("team").unwrap_or(item);
                    Some(EspnTeam {
                        id: pick_string(team, &["id"])?,
                        abbreviation: pick_string(team, &["abbreviation"]),
                        display_name: pick_string(team, &["displayName", "name"])?,
                        short_name: pick_string(team, &["shortDisplayName"]),
                        nickname: pick_string(team, &["name", "nickname"]),
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    Ok(teams)
}

/// Matches on the feed code first, then on any of the listed names.
pub fn find_team_id(teams: &[EspnTeam], team: &TeamIdentity) -> Option<String> {
    let code = team
        .feed_id
        .as_deref()
        .or(team.abbreviation.as_deref())
        .map(|c| c.trim().to_ascii_uppercase());
    if let Some(code) = code
        && let Some(hit) = teams.iter().find(|t| {
            t.id == code
                || t.abbreviation
                    .as_deref()
                    .is_some_and(|a| a.eq_ignore_ascii_case(&code))
        })
    {
        return Some(hit.id.clone());
    }

    let wanted = team_key(&team.name);
    if let Some(hit) = teams.iter().find(|t| {
        team_key(&t.display_name) == wanted
            || t.short_name.as_deref().is_some_and(|s| team_key(s) == wanted)
    }) {
        return Some(hit.id.clone());
    }

    // nicknames repeat across college programs, so only a unique one counts
    let mut by_nickname = teams
        .iter()
        .filter(|t| t.nickname.as_deref().is_some_and(|n| team_key(n) == wanted));
    match (by_nickname.next(), by_nickname.next()) {
        (Some(hit), None) => Some(hit.id.clone()),
        _ => None,
    }
}

/// Accepts both a flat `athletes` list and position groups
/// (`athletes: [{ position, items: [..] }]`).
pub fn parse_espn_roster_json(raw: &str) -> Result<Vec<ExternalRosterRecord>> {
    let Some(root) = parse_body(raw, "espn roster")? else {
        return Ok(Vec::new());
    };
    let Some(entries) = root.get("athletes").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    let mut records = Vec::new();
    for entry in entries {
        match entry.get("items").and_then(Value::as_array) {
            Some(items) => records.extend(items.iter().filter_map(parse_athlete)),
            None => records.extend(parse_athlete(entry)),
        }
    }
    Ok(records)
}

fn parse_athlete(value: &Value) -> Option<ExternalRosterRecord> {
    let name = pick_string(value, &["fullName", "displayName"]).or_else(|| {
        let first = pick_string(value, &["firstName"])?;
        let last = pick_string(value, &["lastName"])?;
        Some(format!("{first} {last}"))
    })?;
    if normalize_name(&name).is_empty() {
        return None;
    }

    let mut record = ExternalRosterRecord::new(&name);
    record.jersey = pick_string(value, &["jersey"]);
    record.position = value
        .get("position")
        .and_then(|p| pick_string(p, &["abbreviation", "displayName", "name"]).or_else(|| as_text(p)));
    record.photo_url = value
        .get("headshot")
        .and_then(|h| pick_string(h, &["href"]));
    record.external_id = pick_string(value, &["id"]);
    // US feeds report inches and pounds
    record.height_cm = as_f64(value.get("height"))
        .filter(|h| *h > 0.0)
        .map(|inches| (inches * 2.54).round() as u16);
    record.weight_kg = as_f64(value.get("weight"))
        .filter(|w| *w > 0.0)
        .map(|lbs| (lbs * 0.453_592).round() as u16);
    record.birth_date = pick_string(value, &["dateOfBirth"])
        .map(|d| d.split('T').next().unwrap_or_default().to_string());
    record.place_of_birth = value.get("birthPlace").and_then(|place| {
        let parts: Vec<String> = ["city", "state", "country"]
            .iter()
            .filter_map(|k| pick_string(place, &[*k]))
            .collect();
        (!parts.is_empty()).then(|| parts.join(", "))
    });
    Some(record)
}
