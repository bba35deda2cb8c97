use std::cmp::Reverse;
use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::league::{League, LeagueTier};
use crate::model::{ExtractionMode, TeamCandidate, TeamIdentity};
use crate::normalize::{is_placeholder, team_key};
use crate::registry::{RegistryEntry, TeamRegistry, identity_of};
use crate::store::PersistedStore;

const AMBIGUITY_MIN_KEY: usize = 4;
const AMBIGUITY_MAX_KEY: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionSource {
    /// The caller confirmed the team.
    Manual,
    Exact,
    /// Best of the overlapping registry keys.
    Ranked,
    /// Persisted alias table.
    Alias,
    /// Unknown team with a league hint: every team of the league offered.
    LeagueListing,
    Unresolved,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamResolution {
    pub team: TeamIdentity,
    pub candidates: Option<Vec<TeamCandidate>>,
    pub source: ResolutionSource,
}

impl TeamResolution {
    pub fn is_ambiguous(&self) -> bool {
        self.candidates.as_ref().is_some_and(|c| c.len() > 1)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    /// Team name guessed by the extractor.
    pub extracted_name: &'a str,
    pub manual_team: Option<&'a str>,
    pub league_hint: Option<League>,
    /// Sport reported by the extractor, used when nothing resolves.
    pub sport: Option<&'a str>,
    pub mode: ExtractionMode,
}

/// Maps an extracted team name to a canonical identity using the injected
/// registry, with the persisted alias table as a fallback.
pub struct TeamResolver<'a> {
    registry: &'a TeamRegistry,
    store: &'a dyn PersistedStore,
}

impl<'a> TeamResolver<'a> {
    pub fn new(registry: &'a TeamRegistry, store: &'a dyn PersistedStore) -> Self {
        Self { registry, store }
    }

    pub fn resolve(&self, req: &ResolveRequest<'_>) -> TeamResolution {
        let sport = fallback_sport(req);

        if let Some(manual) = req.manual_team.map(str::trim).filter(|m| !is_placeholder(m)) {
            let key = team_key(manual);
            let team = self
                .registry
                .get(&key)
                .cloned()
                .or_else(|| self.alias(&key))
                .map(|c| TeamIdentity::from(&c))
                .unwrap_or_else(|| TeamIdentity::unresolved(manual, &sport, req.league_hint));
            info!(team = %team.name, "using caller-confirmed team");
            return TeamResolution {
                team,
                candidates: None,
                source: ResolutionSource::Manual,
            };
        }

        let sentinel = req.mode.unknown_team_label();
        let name = req.extracted_name.trim();
        if is_placeholder(name) || name.eq_ignore_ascii_case(sentinel) {
            return self.unknown(sentinel, &sport, req.league_hint);
        }

        let key = team_key(name);
        let exact = self.registry.get(&key);
        let ranked = self.ranked_candidates(&key);

        if ranked.len() > 1 {
            let top = ranked[0].clone();
            info!(
                team = %name,
                provisional = %top.name,
                candidates = ranked.len(),
                "ambiguous team name"
            );
            return TeamResolution {
                team: TeamIdentity::from(&top),
                candidates: Some(ranked),
                source: ResolutionSource::Ranked,
            };
        }

        if let Some(team) = exact {
            debug!(team = %team.name, "exact registry match");
            return TeamResolution {
                team: TeamIdentity::from(team),
                candidates: None,
                source: ResolutionSource::Exact,
            };
        }

        if let Some(only) = ranked.into_iter().next() {
            debug!(team = %only.name, "single overlapping registry match");
            return TeamResolution {
                team: TeamIdentity::from(&only),
                candidates: None,
                source: ResolutionSource::Ranked,
            };
        }

        if let Some(team) = self.alias(&key) {
            debug!(team = %team.name, "alias table match");
            return TeamResolution {
                team: TeamIdentity::from(&team),
                candidates: None,
                source: ResolutionSource::Alias,
            };
        }

        debug!(team = %name, "team not in registry");
        TeamResolution {
            team: TeamIdentity::unresolved(name, &sport, req.league_hint),
            candidates: None,
            source: ResolutionSource::Unresolved,
        }
    }

    /// Distinct teams whose keys overlap `key`, best first. Empty when the key
    /// is too short or too long to compare meaningfully.
    pub fn ranked_candidates(&self, key: &str) -> Vec<TeamCandidate> {
        let len = key.chars().count();
        if !(AMBIGUITY_MIN_KEY..=AMBIGUITY_MAX_KEY).contains(&len) {
            return Vec::new();
        }
        let mut entries = self.registry.overlapping(key);
        entries.sort_by_key(|e| Reverse(rank(e, key)));

        let mut seen = HashSet::new();
        entries
            .into_iter()
            .filter(|e| seen.insert(identity_of(&e.team)))
            .map(|e| e.team.clone())
            .collect()
    }

    fn unknown(&self, sentinel: &str, sport: &str, league: Option<League>) -> TeamResolution {
        let Some(league) = league else {
            return TeamResolution {
                team: TeamIdentity::unresolved(sentinel, sport, None),
                candidates: None,
                source: ResolutionSource::Unresolved,
            };
        };
        let teams = self.registry.teams_in_league(league);
        info!(league = league.code(), teams = teams.len(), "team unknown, offering league listing");
        TeamResolution {
            team: TeamIdentity::unresolved(sentinel, league.sport(), Some(league)),
            candidates: (!teams.is_empty()).then_some(teams),
            source: ResolutionSource::LeagueListing,
        }
    }

    fn alias(&self, key: &str) -> Option<TeamCandidate> {
        match self.store.alias(key) {
            Ok(found) => found,
            Err(err) => {
                warn!(key, error = %format!("{err:#}"), "alias lookup failed");
                None
            }
        }
    }
}

/// Exact equality, then league tier, then longer key.
fn rank(entry: &RegistryEntry, key: &str) -> (bool, LeagueTier, usize) {
    let tier = entry
        .team
        .league
        .map(League::tier)
        .unwrap_or(LeagueTier::Other);
    (entry.key == key, tier, entry.key.len())
}

fn fallback_sport(req: &ResolveRequest<'_>) -> String {
    req.sport
        .map(str::trim)
        .filter(|s| !is_placeholder(s))
        .map(str::to_string)
        .or_else(|| req.league_hint.map(|l| l.sport().to_string()))
        .unwrap_or_else(|| "General".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NullStore;

    fn request(name: &str) -> ResolveRequest<'_> {
        ResolveRequest {
            extracted_name: name,
            manual_team: None,
            league_hint: None,
            sport: None,
            mode: ExtractionMode::Standard,
        }
    }

    #[test]
    fn exact_name_resolves_without_candidates() {
        let registry = TeamRegistry::builtin();
        let resolver = TeamResolver::new(&registry, &NullStore);
        let out = resolver.resolve(&request("Boston Celtics 2025-26"));
        assert_eq!(out.team.name, "Boston Celtics");
        assert_eq!(out.source, ResolutionSource::Exact);
        assert!(out.candidates.is_none());
    }

    #[test]
    fn aliases_of_one_team_are_not_ambiguous() {
        let registry = TeamRegistry::builtin();
        let resolver = TeamResolver::new(&registry, &NullStore);
        let out = resolver.resolve(&request("LA Kings"));
        assert_eq!(out.team.name, "Los Angeles Kings");
        assert!(!out.is_ambiguous());
    }

    #[test]
    fn major_league_ranks_above_minor() {
        let registry = TeamRegistry::builtin();
        let resolver = TeamResolver::new(&registry, &NullStore);
        let out = resolver.resolve(&request("Sacramento"));
        let candidates = out.candidates.expect("two sacramento teams");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "Sacramento Kings");
        assert_eq!(candidates[1].name, "Sacramento River Cats");
        assert_eq!(out.team.name, "Sacramento Kings");
    }

    #[test]
    fn manual_team_skips_ambiguity() {
        let registry = TeamRegistry::builtin();
        let resolver = TeamResolver::new(&registry, &NullStore);
        let mut req = request("Kings");
        req.manual_team = Some("Sacramento Kings");
        let out = resolver.resolve(&req);
        assert_eq!(out.source, ResolutionSource::Manual);
        assert_eq!(out.team.name, "Sacramento Kings");
        assert!(out.candidates.is_none());
    }

    #[test]
    fn unknown_team_without_hint_has_no_candidates() {
        let registry = TeamRegistry::builtin();
        let resolver = TeamResolver::new(&registry, &NullStore);
        let out = resolver.resolve(&request("Unknown Team"));
        assert!(out.team.is_unknown());
        assert!(out.candidates.is_none());
    }

    #[test]
    fn short_keys_skip_ambiguity_scan() {
        let registry = TeamRegistry::builtin();
        let resolver = TeamResolver::new(&registry, &NullStore);
        assert!(resolver.ranked_candidates("NY").is_empty());
    }
}
