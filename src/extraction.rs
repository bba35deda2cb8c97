use chrono::{Datelike, Utc};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::contract::{ExtractionContract, build_contract};
use crate::error::ExtractionError;
use crate::generative::{GenerationRequest, GenerationResponse, GenerativeClient};
use crate::json_repair::parse_lenient;
use crate::league::League;
use crate::model::{
    Athlete, AthleteStatus, ExtractionMode, PLACEHOLDER_POSITION, VerificationSource,
};
use crate::normalize::{clean_optional, format_jersey_number, to_safe_name};
use crate::tier::{Capability, SubscriptionTier};
use crate::usage::CallUsage;

#[derive(Debug, Clone)]
pub struct ExtractionInput<'a> {
    pub text: &'a str,
    pub tier: SubscriptionTier,
    pub mode: ExtractionMode,
    pub season_override: Option<&'a str>,
    pub find_branding: bool,
    pub league_hint: Option<League>,
    /// Canonical team names of the hinted league, embedded in the prompt.
    pub valid_teams: &'a [String],
    pub search_budget: u32,
}

/// Root-level values the extractor reported, placeholders already removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTeam {
    pub abbreviation: Option<String>,
    pub conference: Option<String>,
    pub country_code: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo_url: Option<String>,
    pub pantone: Option<String>,
    pub cmyk: Option<String>,
    pub rgb: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub team_name: String,
    pub sport: Option<String>,
    pub season_year: String,
    pub team: ExtractedTeam,
    pub athletes: Vec<Athlete>,
    pub verification_sources: Vec<VerificationSource>,
    pub attempt: Attempt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Full prompt, search enabled when branding discovery was asked for.
    Primary,
    /// Simplified prompt, never searches.
    Fallback,
}

impl Attempt {
    pub fn label(self) -> &'static str {
        match self {
            Attempt::Primary => "primary",
            Attempt::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    CallFailed,
    ParseFailed,
    /// Well-formed but no athletes while the input had text.
    Empty,
    Extracted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Done,
    Retry(Attempt),
    Failed,
}

/// Retry policy: any non-success on the primary attempt gets exactly one
/// simplified retry; the fallback's outcome is final.
pub fn transition(attempt: Attempt, outcome: Outcome) -> Transition {
    match (attempt, outcome) {
        (_, Outcome::Extracted) => Transition::Done,
        (Attempt::Primary, _) => Transition::Retry(Attempt::Fallback),
        (Attempt::Fallback, _) => Transition::Failed,
    }
}

/// Runs the extraction with at most one retry. Every call that reached the
/// service is pushed onto `usage`, whether or not the run succeeds.
pub fn extract(
    client: &dyn GenerativeClient,
    input: &ExtractionInput<'_>,
    usage: &mut Vec<CallUsage>,
) -> Result<Extraction, ExtractionError> {
    let input_chars = input.text.trim().chars().count();
    if input_chars == 0 {
        debug!("blank input, skipping extraction call");
        return Ok(empty_extraction(input));
    }

    let contract = build_contract(input.tier, input.mode, input.find_branding);
    let mut attempt = Attempt::Primary;

    loop {
        let request = build_request(input, &contract, attempt);
        info!(
            attempt = attempt.label(),
            search = request.use_search,
            tier = input.tier.label(),
            "requesting roster extraction"
        );

        let (outcome, result) = run_attempt(client, input, &request, attempt, usage);
        match transition(attempt, outcome) {
            Transition::Done => {
                let extraction = result?;
                info!(
                    attempt = attempt.label(),
                    athletes = extraction.athletes.len(),
                    team = %extraction.team_name,
                    "extraction complete"
                );
                return Ok(extraction);
            }
            Transition::Retry(next) => {
                warn!(
                    attempt = attempt.label(),
                    outcome = ?outcome,
                    "extraction attempt unsuccessful, retrying without search"
                );
                attempt = next;
            }
            Transition::Failed => {
                warn!(attempt = attempt.label(), outcome = ?outcome, "extraction failed");
                return Err(match result {
                    Ok(_) => ExtractionError::Empty { input_chars },
                    Err(err) => err,
                });
            }
        }
    }
}

fn run_attempt(
    client: &dyn GenerativeClient,
    input: &ExtractionInput<'_>,
    request: &GenerationRequest,
    attempt: Attempt,
    usage: &mut Vec<CallUsage>,
) -> (Outcome, Result<Extraction, ExtractionError>) {
    let response = match client.generate(request) {
        Ok(r) => r,
        Err(err) => {
            warn!(attempt = attempt.label(), error = %format!("{err:#}"), "extraction call failed");
            return (
                Outcome::CallFailed,
                Err(ExtractionError::Service(format!("{err:#}"))),
            );
        }
    };
    usage.push(CallUsage::from_response(client.model_name(), &response));

    match parse_response(&response, input, attempt) {
        Ok(extraction) if extraction.athletes.is_empty() => (Outcome::Empty, Ok(extraction)),
        Ok(extraction) => (Outcome::Extracted, Ok(extraction)),
        Err(err) => (Outcome::ParseFailed, Err(err)),
    }
}

fn parse_response(
    response: &GenerationResponse,
    input: &ExtractionInput<'_>,
    attempt: Attempt,
) -> Result<Extraction, ExtractionError> {
    let (value, strategy) = parse_lenient(&response.text)?;
    debug!(attempt = attempt.label(), strategy = ?strategy, "parsed extraction response");
    let Value::Object(root) = value else {
        return Err(ExtractionError::parse(&response.text));
    };
    let mut extraction = map_root(&root, input);
    extraction.verification_sources = response.sources.clone();
    extraction.attempt = attempt;
    Ok(extraction)
}

pub fn build_request(
    input: &ExtractionInput<'_>,
    contract: &ExtractionContract,
    attempt: Attempt,
) -> GenerationRequest {
    let use_search = attempt == Attempt::Primary && input.find_branding && input.search_budget > 0;
    let system_instruction = match attempt {
        Attempt::Primary => system_instruction(input, use_search),
        Attempt::Fallback => fallback_instruction(input),
    };
    let mode = match input.mode {
        ExtractionMode::Standard => "Standard",
        ExtractionMode::Noc => "NOC",
    };
    let prompt = format!(
        "Tier: {}. Mode: {}. Data:\n{}",
        input.tier.label(),
        mode,
        input.text.trim()
    );
    GenerationRequest {
        system_instruction,
        prompt,
        response_schema: Some(contract.to_json_schema()),
        use_search,
    }
}

pub fn system_instruction(input: &ExtractionInput<'_>, use_search: bool) -> String {
    let sentinel = input.mode.unknown_team_label();
    let mut rules = vec![
        "You are an expert broadcast metadata extractor.".to_string(),
        "- COMPLETENESS: every athlete named in the input must appear in the output, in input order. Never drop, merge or invent entries.".to_string(),
        "- JERSEY NUMBERS: use at least two digits ('3' becomes '03'). When no number is given use \"00\".".to_string(),
        format!("- POSITION: when no position is given use \"{PLACEHOLDER_POSITION}\"."),
        "- NORMALIZE: the safe display name is the full name in UPPERCASE with accents and diacritics removed.".to_string(),
    ];

    match (input.league_hint, input.valid_teams.is_empty()) {
        (Some(league), false) => rules.push(format!(
            "- TEAM: the roster belongs to the {} ({}). Identify the team and return its exact name from this list: {}. If none fits, return \"{sentinel}\".",
            league.code(),
            league.sport(),
            input.valid_teams.join(", ")
        )),
        _ => rules.push(format!(
            "- TEAM: do not guess the team. Unless the text states the team name explicitly, return \"{sentinel}\" as teamName."
        )),
    }

    if use_search {
        rules.push(format!(
            "- BRANDING DISCOVERY: use search (at most {} queries) to find the official logo URL and primary/secondary hex colours. Leave a branding field empty when it cannot be verified.",
            input.search_budget
        ));
    } else {
        rules.push("- BRANDING: leave branding fields empty.".to_string());
    }
    rules.push("- OUTPUT: valid JSON matching the provided schema.".to_string());
    rules.join("\n")
}

fn fallback_instruction(input: &ExtractionInput<'_>) -> String {
    format!(
        "Extract every athlete listed in the text as JSON matching the schema. \
Use \"00\" for a missing jersey number and \"{PLACEHOLDER_POSITION}\" for a missing position. \
Names in UPPERCASE without accents. Return \"{}\" as teamName unless the text names the team.",
        input.mode.unknown_team_label()
    )
}

fn map_root(root: &Map<String, Value>, input: &ExtractionInput<'_>) -> Extraction {
    let text = |key: &str| root.get(key).and_then(value_text);

    let season_year = input
        .season_override
        .and_then(|s| clean_optional(Some(s)))
        .or_else(|| text("seasonYear"))
        .unwrap_or_else(|| Utc::now().year().to_string());
    let team_name = text("teamName").unwrap_or_else(|| input.mode.unknown_team_label().to_string());
    let team = ExtractedTeam {
        abbreviation: text("abbreviation"),
        conference: text("conference"),
        country_code: text("countryCode"),
        primary_color: text("primaryColor"),
        secondary_color: text("secondaryColor"),
        logo_url: text("logoUrl"),
        pantone: text("pantone"),
        cmyk: text("cmyk"),
        rgb: text("rgb"),
    };

    let stamp = Utc::now().timestamp_millis();
    let athletes = root
        .get("athletes")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|raw| map_athlete(raw, input, &season_year, team.country_code.as_deref()))
                .enumerate()
                .map(|(idx, mut athlete)| {
                    athlete.id = format!("athlete-{idx}-{stamp}");
                    athlete
                })
                .collect()
        })
        .unwrap_or_default();

    Extraction {
        team_name,
        sport: text("sport"),
        season_year,
        team,
        athletes,
        verification_sources: Vec::new(),
        attempt: Attempt::Primary,
    }
}

fn map_athlete(
    raw: &Map<String, Value>,
    input: &ExtractionInput<'_>,
    season_year: &str,
    team_country: Option<&str>,
) -> Option<Athlete> {
    let text = |key: &str| raw.get(key).and_then(value_text);
    let full_name = text("fullName").or_else(|| text("name"))?;
    let tier = input.tier;
    let gated = |cap: Capability, key: &str| if tier.permits(cap) { text(key) } else { None };

    let safe_source = gated(Capability::SafeDisplayName, "displayNameSafe");
    let display_name_safe = to_safe_name(safe_source.as_deref().unwrap_or(&full_name));
    let status = gated(Capability::Status, "nilStatus")
        .and_then(|s| AthleteStatus::parse(&s))
        .unwrap_or_default();

    let (country_code, event) = match input.mode {
        ExtractionMode::Noc => (
            text("countryCode").or_else(|| team_country.map(str::to_string)),
            text("event"),
        ),
        ExtractionMode::Standard => (None, None),
    };

    Some(Athlete {
        id: String::new(),
        original_name: full_name.clone(),
        display_name_safe,
        jersey_number: format_jersey_number(text("jerseyNumber").as_deref()),
        position: text("position").unwrap_or_else(|| PLACEHOLDER_POSITION.to_string()),
        phonetic_simplified: gated(Capability::PhoneticSimplified, "phoneticSimplified"),
        phonetic_ipa: gated(Capability::PhoneticIpa, "phoneticIPA"),
        status,
        season_year: season_year.to_string(),
        name_spanish: gated(Capability::LocalizedNames, "nameSpanish"),
        name_mandarin: gated(Capability::LocalizedNames, "nameMandarin"),
        bio_stats: gated(Capability::Bio, "bioStats"),
        social_handle: gated(Capability::SocialHandle, "socialHandle"),
        country_code,
        event,
        full_name,
        ..Athlete::default()
    })
}

/// Strings and numbers as trimmed text; placeholder literals count as unset.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean_optional(Some(s)),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn empty_extraction(input: &ExtractionInput<'_>) -> Extraction {
    let season_year = input
        .season_override
        .and_then(|s| clean_optional(Some(s)))
        .unwrap_or_else(|| Utc::now().year().to_string());
    Extraction {
        team_name: input.mode.unknown_team_label().to_string(),
        sport: None,
        season_year,
        team: ExtractedTeam::default(),
        athletes: Vec::new(),
        verification_sources: Vec::new(),
        attempt: Attempt::Primary,
    }
}
