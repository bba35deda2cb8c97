use anyhow::Result;
use tracing::{info, warn};

use crate::branding::BrandingCache;
use crate::config::EngineConfig;
use crate::error::ExtractionError;
use crate::extraction::{ExtractionInput, extract};
use crate::generative::{GeminiClient, GenerativeClient};
use crate::league::League;
use crate::model::{
    ExtractionMode, ReconciliationResult, TeamCandidate, TeamIdentity, UNKNOWN_NOC, UNKNOWN_TEAM,
};
use crate::normalize::{is_placeholder, team_key};
use crate::phonetics::backfill_phonetics;
use crate::reconcile::reconcile;
use crate::registry::TeamRegistry;
use crate::resolver::{ResolutionSource, ResolveRequest, TeamResolver};
use crate::roster_feed::{DisabledFeed, FeedRouter, RosterFeed, fetch_or_empty};
use crate::store::{NullStore, PersistedStore, SqliteStore};
use crate::tier::SubscriptionTier;
use crate::usage::{self, UsageOperation};

/// One inbound reconciliation call.
#[derive(Debug, Clone, Default)]
pub struct ExtractionRequest {
    pub text: String,
    pub tier: SubscriptionTier,
    pub mode: ExtractionMode,
    pub season_override: Option<String>,
    pub find_branding: bool,
    pub user_id: Option<String>,
    pub league_hint: Option<League>,
    /// Team the caller already confirmed; always wins over the extractor.
    pub manual_team: Option<String>,
}

pub struct RosterEngine {
    config: EngineConfig,
    client: Option<Box<dyn GenerativeClient>>,
    registry: TeamRegistry,
    store: Box<dyn PersistedStore>,
    feed: Box<dyn RosterFeed>,
}

impl RosterEngine {
    pub fn new(
        config: EngineConfig,
        client: Option<Box<dyn GenerativeClient>>,
        registry: TeamRegistry,
        store: Box<dyn PersistedStore>,
        feed: Box<dyn RosterFeed>,
    ) -> Self {
        Self {
            config,
            client,
            registry,
            store,
            feed,
        }
    }

    /// Production wiring: Gemini client when a key is set, SQLite store when
    /// the database opens, live feeds unless switched off.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        let client = GeminiClient::from_config(&config)?
            .map(|c| Box::new(c) as Box<dyn GenerativeClient>);

        let store: Box<dyn PersistedStore> = match config.db_path.as_deref() {
            Some(path) => match SqliteStore::open(path) {
                Ok(store) => Box::new(store),
                Err(err) => {
                    warn!(path = %path.display(), error = %format!("{err:#}"), "store unavailable, caching disabled");
                    Box::new(NullStore)
                }
            },
            None => Box::new(NullStore),
        };

        let feed: Box<dyn RosterFeed> = if config.feeds_enabled {
            Box::new(FeedRouter::new(config.feed_timeout)?)
        } else {
            Box::new(DisabledFeed)
        };

        Ok(Self::new(config, client, TeamRegistry::builtin(), store, feed))
    }

    pub fn registry(&self) -> &TeamRegistry {
        &self.registry
    }

    pub fn process(&self, req: &ExtractionRequest) -> Result<ReconciliationResult, ExtractionError> {
        let client = self.client.as_deref().ok_or_else(|| {
            ExtractionError::NotConfigured("no generative API key configured".to_string())
        })?;
        let store = self.store.as_ref();
        let user_id = req.user_id.as_deref();

        let valid_teams: Vec<String> = req
            .league_hint
            .map(|league| {
                self.registry
                    .teams_in_league(league)
                    .into_iter()
                    .map(|t| t.name)
                    .collect()
            })
            .unwrap_or_default();
        let input = ExtractionInput {
            text: &req.text,
            tier: req.tier,
            mode: req.mode,
            season_override: req.season_override.as_deref(),
            find_branding: req.find_branding,
            league_hint: req.league_hint,
            valid_teams: &valid_teams,
            search_budget: self.config.search_tool_budget,
        };
        let mut calls = Vec::new();
        let extraction = extract(client, &input, &mut calls);
        usage::record(store, user_id, UsageOperation::RosterImport, &calls);
        let extraction = extraction?;

        let resolver = TeamResolver::new(&self.registry, store);
        let resolution = resolver.resolve(&ResolveRequest {
            extracted_name: &extraction.team_name,
            manual_team: req.manual_team.as_deref(),
            league_hint: req.league_hint,
            sport: extraction.sport.as_deref(),
            mode: req.mode,
        });
        if resolution.source == ResolutionSource::Manual {
            self.remember_alias(&extraction.team_name, &resolution.team);
        }
        let team = &resolution.team;

        let cache = BrandingCache::new(&self.registry, store);
        let feed = self.feed.as_ref();
        let (found_branding, roster) =
            rayon::join(|| cache.lookup(team), || fetch_or_empty(feed, team));

        let mut outcome = reconcile(extraction.athletes, &roster, req.tier, &extraction.season_year);
        info!(
            team = %team.name,
            official = outcome.official_count,
            matched = outcome.matched_count,
            missing = outcome.missing.len(),
            "roster reconciled"
        );

        let phonetics =
            backfill_phonetics(client, req.tier, &mut outcome.athletes, &mut outcome.missing);
        if let Some(call) = phonetics.usage {
            usage::record(store, user_id, UsageOperation::PhoneticBackfill, &[call]);
        }

        let branding = cache.settle(team, found_branding, &extraction.team, req.find_branding);

        Ok(ReconciliationResult {
            team_name: team.name.clone(),
            sport: team.sport.clone(),
            league: team.league.or(req.league_hint),
            season_year: extraction.season_year,
            mode: req.mode,
            athletes: outcome.athletes,
            official_roster_count: outcome.official_count,
            matched_count: outcome.matched_count,
            missing_athletes: outcome.missing,
            branding: Some(branding),
            candidates: resolution.candidates,
            verification_sources: extraction.verification_sources,
        })
    }

    /// A confirmed team known to the registry or alias table is stored under
    /// the name the extractor guessed, so the next paste resolves directly.
    fn remember_alias(&self, extracted_name: &str, team: &TeamIdentity) {
        let name = extracted_name.trim();
        let sentinel = [UNKNOWN_TEAM, UNKNOWN_NOC]
            .iter()
            .any(|label| name.eq_ignore_ascii_case(label));
        if sentinel || is_placeholder(name) || team.is_unknown() {
            return;
        }
        let key = team_key(name);
        if key.is_empty() || key == team_key(&team.name) || self.registry.get(&key).is_some() {
            return;
        }
        let Some(candidate) = candidate_of(team) else {
            return;
        };
        if let Err(err) = self.store.upsert_alias(&key, &candidate) {
            warn!(alias = %key, error = %format!("{err:#}"), "failed to store team alias");
        }
    }
}

/// Only identities that came from the registry or alias table carry colours.
fn candidate_of(team: &TeamIdentity) -> Option<TeamCandidate> {
    Some(TeamCandidate {
        name: team.name.clone(),
        feed_id: team.feed_id.clone(),
        sport: team.sport.clone(),
        league: team.league,
        primary_color: team.primary_color.clone()?,
        secondary_color: team.secondary_color.clone()?,
        logo_url: team.logo_url.clone(),
        abbreviation: team.abbreviation.clone(),
    })
}
