use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::model::{Athlete, AthleteStatus, ExternalRoster, ExternalRosterRecord, PLACEHOLDER_POSITION};
use crate::normalize::{
    first_initial, format_jersey_number, is_placeholder, last_name_key, normalize_name,
    to_safe_name,
};
use crate::tier::{Capability, SubscriptionTier};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub athletes: Vec<Athlete>,
    /// In the official roster but not in the pasted text.
    pub missing: Vec<Athlete>,
    /// Distinct official records claimed by an extracted athlete.
    pub matched_count: usize,
    pub official_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    LastNameInitial,
}

/// Cross-checks extracted athletes against the official roster. The athlete
/// list keeps its length and order; only field values change.
pub fn reconcile(
    mut athletes: Vec<Athlete>,
    roster: &ExternalRoster,
    tier: SubscriptionTier,
    season_year: &str,
) -> Reconciliation {
    let official_count = roster.len();
    if roster.is_empty() {
        return Reconciliation {
            athletes,
            missing: Vec::new(),
            matched_count: 0,
            official_count,
        };
    }

    let by_last_name = index_last_names(roster);
    let mut claimed: HashSet<&str> = HashSet::new();

    for athlete in athletes.iter_mut() {
        let Some((record, kind)) = find_match(athlete, roster, &by_last_name, &claimed) else {
            continue;
        };
        debug!(athlete = %athlete.full_name, official = %record.display_name, kind = ?kind, "matched");
        claimed.insert(record.name_key.as_str());
        backfill(athlete, record, tier);
    }

    let missing: Vec<Athlete> = roster
        .values()
        .filter(|r| !claimed.contains(r.name_key.as_str()))
        .enumerate()
        .map(|(idx, record)| synthesize(idx, record, tier, season_year))
        .collect();

    Reconciliation {
        athletes,
        matched_count: claimed.len(),
        missing,
        official_count,
    }
}

fn index_last_names(roster: &ExternalRoster) -> HashMap<String, Vec<&ExternalRosterRecord>> {
    let mut index: HashMap<String, Vec<&ExternalRosterRecord>> = HashMap::new();
    for record in roster.values() {
        if let Some(last) = last_name_key(&record.display_name) {
            index.entry(last).or_default().push(record);
        }
    }
    index
}

/// Exact normalized name first. Otherwise only a last name that is unique in
/// the official roster, with a matching first initial, on an unclaimed record.
fn find_match<'r>(
    athlete: &Athlete,
    roster: &'r ExternalRoster,
    by_last_name: &HashMap<String, Vec<&'r ExternalRosterRecord>>,
    claimed: &HashSet<&str>,
) -> Option<(&'r ExternalRosterRecord, MatchKind)> {
    let key = normalize_name(&athlete.full_name);
    if let Some(record) = roster.get(&key) {
        return Some((record, MatchKind::Exact));
    }

    let last = last_name_key(&athlete.full_name)?;
    let [record] = by_last_name.get(&last)?.as_slice() else {
        return None;
    };
    if claimed.contains(record.name_key.as_str()) {
        return None;
    }
    let initial = first_initial(&athlete.full_name)?;
    (first_initial(&record.display_name) == Some(initial)).then_some((*record, MatchKind::LastNameInitial))
}

pub fn is_placeholder_jersey(raw: &str) -> bool {
    let t = raw.trim().trim_start_matches('#');
    t.is_empty() || t == "00" || is_placeholder(t)
}

pub fn is_placeholder_position(raw: &str) -> bool {
    let t = raw.trim();
    is_placeholder(t)
        || t.eq_ignore_ascii_case(PLACEHOLDER_POSITION)
        || t.eq_ignore_ascii_case("UNK")
        || t == "?"
}

fn backfill(athlete: &mut Athlete, record: &ExternalRosterRecord, tier: SubscriptionTier) {
    if tier.permits(Capability::Jersey)
        && is_placeholder_jersey(&athlete.jersey_number)
        && let Some(jersey) = record.jersey.as_deref()
    {
        athlete.jersey_number = format_jersey_number(Some(jersey));
    }
    if tier.permits(Capability::Position)
        && is_placeholder_position(&athlete.position)
        && let Some(position) = record.position.as_deref()
    {
        athlete.position = position.to_string();
    }

    athlete.full_name = record.display_name.clone();
    athlete.display_name_safe = to_safe_name(&record.display_name);
    fill_extended(athlete, record, tier);
}

fn fill_extended(athlete: &mut Athlete, record: &ExternalRosterRecord, tier: SubscriptionTier) {
    let (first, last) = split_name(&record.display_name);
    athlete.first_name = athlete.first_name.take().or(first);
    athlete.last_name = athlete.last_name.take().or(last);
    athlete.photo_url = athlete.photo_url.take().or_else(|| record.photo_url.clone());
    athlete.external_id = athlete.external_id.take().or_else(|| record.external_id.clone());

    if tier.permits(Capability::Bio) {
        athlete.height_cm = athlete.height_cm.or(record.height_cm);
        athlete.weight_kg = athlete.weight_kg.or(record.weight_kg);
        athlete.birth_date = athlete.birth_date.take().or_else(|| record.birth_date.clone());
        athlete.place_of_birth = athlete
            .place_of_birth
            .take()
            .or_else(|| record.place_of_birth.clone());
    }
}

fn synthesize(
    idx: usize,
    record: &ExternalRosterRecord,
    tier: SubscriptionTier,
    season_year: &str,
) -> Athlete {
    let mut athlete = Athlete {
        id: format!("official-{idx}"),
        original_name: record.display_name.clone(),
        full_name: record.display_name.clone(),
        display_name_safe: to_safe_name(&record.display_name),
        jersey_number: format_jersey_number(record.jersey.as_deref()),
        position: record
            .position
            .clone()
            .unwrap_or_else(|| PLACEHOLDER_POSITION.to_string()),
        status: AthleteStatus::Active,
        season_year: season_year.to_string(),
        ..Athlete::default()
    };
    fill_extended(&mut athlete, record, tier);
    athlete
}

fn split_name(display: &str) -> (Option<String>, Option<String>) {
    match display.trim().split_once(' ') {
        Some((first, rest)) if !rest.trim().is_empty() => {
            (Some(first.to_string()), Some(rest.trim().to_string()))
        }
        _ => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::roster_from_records;

    fn athlete(name: &str, jersey: &str, position: &str) -> Athlete {
        Athlete {
            id: format!("a-{name}"),
            original_name: name.into(),
            full_name: name.into(),
            display_name_safe: to_safe_name(name),
            jersey_number: jersey.into(),
            position: position.into(),
            ..Athlete::default()
        }
    }

    fn record(name: &str, jersey: &str, position: &str) -> ExternalRosterRecord {
        let mut r = ExternalRosterRecord::new(name);
        r.jersey = Some(jersey.into());
        r.position = Some(position.into());
        r
    }

    #[test]
    fn ambiguous_last_name_is_left_alone() {
        let roster = roster_from_records([record("Jon Smith", "23", "WR"), record("Jake Smith", "11", "TE")]);
        let out = reconcile(vec![athlete("J. Smith", "00", "Athlete")], &roster, SubscriptionTier::Basic, "2025");
        assert_eq!(out.athletes[0].jersey_number, "00");
        assert_eq!(out.matched_count, 0);
        assert_eq!(out.missing.len(), 2);
    }

    #[test]
    fn unique_last_name_with_initial_matches() {
        let roster = roster_from_records([record("Jonathan Smith", "23", "WR")]);
        let out = reconcile(vec![athlete("Jon Smith", "00", "")], &roster, SubscriptionTier::Basic, "2025");
        assert_eq!(out.athletes[0].jersey_number, "23");
        assert_eq!(out.athletes[0].position, "WR");
        assert_eq!(out.athletes[0].full_name, "Jonathan Smith");
        assert!(out.missing.is_empty());
    }

    #[test]
    fn wrong_initial_does_not_match() {
        let roster = roster_from_records([record("Marcus Smith", "23", "WR")]);
        let out = reconcile(vec![athlete("Jon Smith", "00", "")], &roster, SubscriptionTier::Basic, "2025");
        assert_eq!(out.matched_count, 0);
    }

    #[test]
    fn real_values_are_not_overwritten() {
        let roster = roster_from_records([record("Jon Smith", "23", "WR")]);
        let out = reconcile(vec![athlete("JON SMITH", "07", "QB")], &roster, SubscriptionTier::Basic, "2025");
        assert_eq!(out.athletes[0].jersey_number, "07");
        assert_eq!(out.athletes[0].position, "QB");
        assert_eq!(out.athletes[0].full_name, "Jon Smith");
    }

    #[test]
    fn duplicate_paste_counts_one_claim() {
        let roster = roster_from_records([record("Jon Smith", "23", "WR"), record("Pat Lee", "5", "CB")]);
        let pasted = vec![athlete("Jon Smith", "", ""), athlete("Jon Smith", "", "")];
        let out = reconcile(pasted, &roster, SubscriptionTier::Basic, "2025");
        assert_eq!(out.athletes.len(), 2);
        assert_eq!(out.matched_count, 1);
        assert_eq!(out.missing.len(), roster.len() - out.matched_count);
        assert_eq!(out.missing[0].jersey_number, "05");
    }

    #[test]
    fn physical_fields_need_bio_capability() {
        let mut r = record("Jon Smith", "23", "WR");
        r.height_cm = Some(190);
        let roster = roster_from_records([r]);
        let basic = reconcile(vec![athlete("Jon Smith", "", "")], &roster, SubscriptionTier::Basic, "2025");
        assert_eq!(basic.athletes[0].height_cm, None);
        let network = reconcile(vec![athlete("Jon Smith", "", "")], &roster, SubscriptionTier::Network, "2025");
        assert_eq!(network.athletes[0].height_cm, Some(190));
    }
}
