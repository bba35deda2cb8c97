use std::collections::{HashMap, HashSet};

use crate::league::League;
use crate::model::TeamCandidate;
use crate::normalize::team_key;
use crate::registry_data::{TABLES, logo_url};

#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub key: String,
    pub team: TeamCandidate,
}

/// Team-name variants mapped to canonical identities. Built explicitly and
/// handed to the resolver so tests can swap in their own tables.
#[derive(Debug, Clone, Default)]
pub struct TeamRegistry {
    entries: Vec<RegistryEntry>,
    by_key: HashMap<String, usize>,
}

impl TeamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry seeded from the hand-verified league tables.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (league, rows) in TABLES {
            for row in rows.iter() {
                let team = TeamCandidate {
                    name: row.name.to_string(),
                    feed_id: Some(row.code.to_string()),
                    sport: league.sport().to_string(),
                    league: Some(*league),
                    primary_color: row.primary.to_string(),
                    secondary_color: row.secondary.to_string(),
                    logo_url: Some(logo_url(*league, row.logo)),
                    abbreviation: Some(row.code.to_string()),
                };
                registry.insert(team, row.aliases);
            }
        }
        registry
    }

    /// Adds `team` under its own name plus every alias. The first team to
    /// claim a key keeps it.
    pub fn insert(&mut self, team: TeamCandidate, aliases: &[&str]) {
        let mut keys = vec![team_key(&team.name)];
        keys.extend(aliases.iter().map(|a| team_key(a)));
        for key in keys {
            if key.is_empty() || self.by_key.contains_key(&key) {
                continue;
            }
            self.by_key.insert(key.clone(), self.entries.len());
            self.entries.push(RegistryEntry {
                key,
                team: team.clone(),
            });
        }
    }

    pub fn with_team(mut self, team: TeamCandidate, aliases: &[&str]) -> Self {
        self.insert(team, aliases);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact lookup by an already normalized key.
    pub fn get(&self, key: &str) -> Option<&TeamCandidate> {
        self.by_key.get(key).map(|idx| &self.entries[*idx].team)
    }

    /// Every entry whose key contains `key` or is contained in it, compared
    /// on whole words so "KINGS" does not hit "VIKINGS".
    pub fn overlapping(&self, key: &str) -> Vec<&RegistryEntry> {
        if key.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|e| contains_words(&e.key, key) || contains_words(key, &e.key))
            .collect()
    }

    /// All distinct teams of a league, in table order.
    pub fn teams_in_league(&self, league: League) -> Vec<TeamCandidate> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|e| e.team.league == Some(league))
            .filter(|e| seen.insert(identity_of(&e.team)))
            .map(|e| e.team.clone())
            .collect()
    }

    /// Branding lookup used by the cache: name must resolve exactly and the
    /// sport must agree when both sides know it.
    pub fn find_branding(&self, team_name: &str, sport: &str) -> Option<&TeamCandidate> {
        let team = self.get(&team_key(team_name))?;
        let sport = sport.trim();
        if sport.is_empty() || is_generic_sport(sport) || team.sport.eq_ignore_ascii_case(sport) {
            return Some(team);
        }
        None
    }
}

/// Logo reference identifies a team across aliases; name is the fallback.
pub fn identity_of(team: &TeamCandidate) -> String {
    team.logo_url
        .clone()
        .unwrap_or_else(|| team_key(&team.name))
}

fn contains_words(haystack: &str, needle: &str) -> bool {
    format!(" {haystack} ").contains(&format!(" {needle} "))
}

fn is_generic_sport(sport: &str) -> bool {
    sport.eq_ignore_ascii_case("general") || sport.eq_ignore_ascii_case("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_aliases_for_la_teams() {
        let registry = TeamRegistry::builtin();
        let kings = registry.get("LA KINGS").expect("alias present");
        assert_eq!(kings.name, "Los Angeles Kings");
        assert_eq!(kings.league, Some(League::Nhl));
        assert_eq!(registry.get("LOS ANGELES KINGS"), Some(kings));
    }

    #[test]
    fn league_listing_dedups_aliases() {
        let registry = TeamRegistry::builtin();
        assert_eq!(registry.teams_in_league(League::Nhl).len(), 32);
        assert_eq!(registry.teams_in_league(League::Nba).len(), 30);
    }

    #[test]
    fn overlap_respects_word_boundaries() {
        let registry = TeamRegistry::builtin();
        let keys: Vec<&str> = registry
            .overlapping("KINGS")
            .iter()
            .map(|e| e.key.as_str())
            .collect();
        assert!(keys.contains(&"SACRAMENTO KINGS"));
        assert!(keys.contains(&"LA KINGS"));
        assert!(!keys.contains(&"MINNESOTA VIKINGS"));
    }

    #[test]
    fn branding_requires_matching_sport() {
        let registry = TeamRegistry::builtin();
        assert!(registry.find_branding("Boston Celtics", "Basketball").is_some());
        assert!(registry.find_branding("Boston Celtics", "").is_some());
        assert!(registry.find_branding("Boston Celtics", "Soccer").is_none());
    }
}
