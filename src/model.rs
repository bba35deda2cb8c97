use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::league::League;

pub const UNKNOWN_TEAM: &str = "Unknown Team";
pub const UNKNOWN_NOC: &str = "Unknown NOC";
pub const DEFAULT_PRIMARY_COLOR: &str = "#5B5FFF";
pub const DEFAULT_SECONDARY_COLOR: &str = "#1A1A1A";
pub const PLACEHOLDER_POSITION: &str = "Athlete";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AthleteStatus {
    #[default]
    Active,
    Transfer,
    Alumni,
    Incoming,
}

impl AthleteStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "active" => Some(AthleteStatus::Active),
            "transfer" | "transferred" => Some(AthleteStatus::Transfer),
            "alumni" | "alum" | "former" => Some(AthleteStatus::Alumni),
            "incoming" | "recruit" | "signee" => Some(AthleteStatus::Incoming),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExtractionMode {
    #[default]
    Standard,
    /// National Olympic Committee delegation: bibs, disciplines, IOC codes.
    Noc,
}

impl ExtractionMode {
    pub fn unknown_team_label(self) -> &'static str {
        match self {
            ExtractionMode::Standard => UNKNOWN_TEAM,
            ExtractionMode::Noc => UNKNOWN_NOC,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    pub id: String,
    pub original_name: String,
    pub full_name: String,
    pub display_name_safe: String,
    pub jersey_number: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic_simplified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic_ipa: Option<String>,
    pub status: AthleteStatus,
    pub season_year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_spanish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_mandarin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio_stats: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl Athlete {
    pub fn needs_phonetic(&self) -> bool {
        self.phonetic_simplified
            .as_deref()
            .is_none_or(|p| p.trim().is_empty())
    }
}

/// One possible resolution of an extracted team name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamCandidate {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<String>,
    pub sport: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<League>,
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

/// The team the rest of the pipeline works against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamIdentity {
    pub name: String,
    pub sport: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<League>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

impl TeamIdentity {
    pub fn unresolved(name: &str, sport: &str, league: Option<League>) -> Self {
        Self {
            name: name.to_string(),
            sport: sport.to_string(),
            league,
            feed_id: None,
            primary_color: None,
            secondary_color: None,
            logo_url: None,
            abbreviation: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name == UNKNOWN_TEAM || self.name == UNKNOWN_NOC
    }
}

impl From<&TeamCandidate> for TeamIdentity {
    fn from(c: &TeamCandidate) -> Self {
        Self {
            name: c.name.clone(),
            sport: c.sport.clone(),
            league: c.league,
            feed_id: c.feed_id.clone(),
            primary_color: Some(c.primary_color.clone()),
            secondary_color: Some(c.secondary_color.clone()),
            logo_url: c.logo_url.clone(),
            abbreviation: c.abbreviation.clone(),
        }
    }
}

/// One player from an authoritative league feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRosterRecord {
    pub name_key: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jersey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
}

impl ExternalRosterRecord {
    pub fn new(display_name: &str) -> Self {
        Self {
            name_key: crate::normalize::normalize_name(display_name),
            display_name: display_name.trim().to_string(),
            jersey: None,
            position: None,
            photo_url: None,
            external_id: None,
            height_cm: None,
            weight_kg: None,
            birth_date: None,
            place_of_birth: None,
        }
    }
}

/// Authoritative snapshot keyed by normalized player name. Ordered so the
/// diff list comes out deterministic.
pub type ExternalRoster = BTreeMap<String, ExternalRosterRecord>;

pub fn roster_from_records(records: impl IntoIterator<Item = ExternalRosterRecord>) -> ExternalRoster {
    let mut out = ExternalRoster::new();
    for record in records {
        if record.name_key.is_empty() {
            continue;
        }
        out.entry(record.name_key.clone()).or_insert(record);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branding {
    pub primary_color: String,
    pub secondary_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_rgb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_rgb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pantone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmyk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<String>,
    pub source: BrandingSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrandingSource {
    Registry,
    Cache,
    Discovered,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSource {
    pub title: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub team_name: String,
    pub sport: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub league: Option<League>,
    pub season_year: String,
    pub mode: ExtractionMode,
    pub athletes: Vec<Athlete>,
    pub official_roster_count: usize,
    pub matched_count: usize,
    pub missing_athletes: Vec<Athlete>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<TeamCandidate>>,
    #[serde(default)]
    pub verification_sources: Vec<VerificationSource>,
}
