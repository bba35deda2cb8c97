use chrono::Utc;
use tracing::{debug, warn};

use crate::extraction::ExtractedTeam;
use crate::model::{
    Branding, BrandingSource, DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR, TeamIdentity,
};
use crate::normalize::{is_placeholder, team_key};
use crate::registry::TeamRegistry;
use crate::store::{BrandingRow, PersistedStore};

pub const DEFAULT_ABBREVIATION: &str = "UNK";
pub const DEFAULT_CONFERENCE: &str = "General";

/// Read-through/write-through branding lookup. The static registry always
/// wins; the store only serves teams the registry does not know.
pub struct BrandingCache<'a> {
    registry: &'a TeamRegistry,
    store: &'a dyn PersistedStore,
}

impl<'a> BrandingCache<'a> {
    pub fn new(registry: &'a TeamRegistry, store: &'a dyn PersistedStore) -> Self {
        Self { registry, store }
    }

    /// Registry first, then the persisted row for (team, sport).
    pub fn lookup(&self, team: &TeamIdentity) -> Option<Branding> {
        if team.is_unknown() {
            return None;
        }
        if let Some(hit) = self.registry.find_branding(&team.name, &team.sport) {
            return Some(from_colors(
                &hit.primary_color,
                &hit.secondary_color,
                hit.abbreviation.clone(),
                hit.logo_url.clone(),
                BrandingSource::Registry,
            ));
        }
        let key = team_key(&team.name);
        match self.store.branding(&key, &sport_key(&team.sport)) {
            Ok(Some(row)) => {
                debug!(team = %team.name, "branding cache hit");
                Some(from_row(row))
            }
            Ok(None) => None,
            Err(err) => {
                warn!(team = %team.name, error = %format!("{err:#}"), "branding cache read failed");
                None
            }
        }
    }

    /// Final branding for the envelope. Discovered values are only taken,
    /// and persisted, when nothing was found and discovery was requested.
    pub fn settle(
        &self,
        team: &TeamIdentity,
        found: Option<Branding>,
        extracted: &ExtractedTeam,
        discovery_requested: bool,
    ) -> Branding {
        let conference = extracted
            .conference
            .clone()
            .unwrap_or_else(|| DEFAULT_CONFERENCE.to_string());

        if let Some(mut branding) = found {
            branding.conference.get_or_insert(conference);
            return branding;
        }

        let discovered = extracted
            .primary_color
            .as_deref()
            .and_then(normalize_hex);
        if discovery_requested && let Some(primary) = discovered {
            let secondary = extracted
                .secondary_color
                .as_deref()
                .and_then(normalize_hex)
                .unwrap_or_else(|| DEFAULT_SECONDARY_COLOR.to_string());
            let mut branding = from_colors(
                &primary,
                &secondary,
                extracted.abbreviation.clone(),
                extracted.logo_url.clone(),
                BrandingSource::Discovered,
            );
            branding.pantone = extracted.pantone.clone();
            if let Some(rgb) = extracted.rgb.clone() {
                branding.primary_rgb = Some(rgb);
            }
            if let Some(cmyk) = extracted.cmyk.clone() {
                branding.cmyk = Some(cmyk);
            }
            branding.conference = Some(conference);
            if !team.is_unknown() {
                self.persist(team, &branding);
            }
            return branding;
        }

        let mut branding = from_colors(
            DEFAULT_PRIMARY_COLOR,
            DEFAULT_SECONDARY_COLOR,
            Some(
                extracted
                    .abbreviation
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ABBREVIATION.to_string()),
            ),
            None,
            BrandingSource::Default,
        );
        branding.conference = Some(conference);
        branding
    }

    fn persist(&self, team: &TeamIdentity, branding: &Branding) {
        let row = BrandingRow {
            team_key: team_key(&team.name),
            sport: sport_key(&team.sport),
            primary_hex: branding.primary_color.clone(),
            secondary_hex: branding.secondary_color.clone(),
            primary_rgb: branding.primary_rgb.clone(),
            secondary_rgb: branding.secondary_rgb.clone(),
            pantone: branding.pantone.clone(),
            cmyk: branding.cmyk.clone(),
            abbreviation: branding.abbreviation.clone(),
            logo_url: branding.logo_url.clone(),
            updated_at: Utc::now().to_rfc3339(),
        };
        if let Err(err) = self.store.upsert_branding(&row) {
            warn!(team = %team.name, error = %format!("{err:#}"), "branding cache write failed");
        }
    }
}

fn from_colors(
    primary: &str,
    secondary: &str,
    abbreviation: Option<String>,
    logo_url: Option<String>,
    source: BrandingSource,
) -> Branding {
    Branding {
        primary_color: primary.to_string(),
        secondary_color: secondary.to_string(),
        primary_rgb: hex_to_rgb(primary),
        secondary_rgb: hex_to_rgb(secondary),
        pantone: None,
        cmyk: hex_to_cmyk(primary),
        abbreviation,
        logo_url,
        conference: None,
        source,
    }
}

fn from_row(row: BrandingRow) -> Branding {
    Branding {
        primary_rgb: row.primary_rgb.or_else(|| hex_to_rgb(&row.primary_hex)),
        secondary_rgb: row.secondary_rgb.or_else(|| hex_to_rgb(&row.secondary_hex)),
        cmyk: row.cmyk.or_else(|| hex_to_cmyk(&row.primary_hex)),
        primary_color: row.primary_hex,
        secondary_color: row.secondary_hex,
        pantone: row.pantone,
        abbreviation: row.abbreviation,
        logo_url: row.logo_url,
        conference: None,
        source: BrandingSource::Cache,
    }
}

fn sport_key(sport: &str) -> String {
    let s = sport.trim();
    if is_placeholder(s) {
        return "general".to_string();
    }
    s.to_ascii_lowercase()
}

/// `#RGB`, `RRGGBB` and `#RRGGBB` in any case become `#RRGGBB`.
pub fn normalize_hex(raw: &str) -> Option<String> {
    let h = raw.trim().trim_start_matches('#');
    if !h.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let full: String = match h.len() {
        3 => h.chars().flat_map(|c| [c, c]).collect(),
        6 => h.to_string(),
        _ => return None,
    };
    Some(format!("#{}", full.to_ascii_uppercase()))
}

fn rgb_components(hex: &str) -> Option<(u8, u8, u8)> {
    let full = normalize_hex(hex)?;
    let channel = |i: usize| u8::from_str_radix(&full[i..i + 2], 16).ok();
    Some((channel(1)?, channel(3)?, channel(5)?))
}

/// "r, g, b"
pub fn hex_to_rgb(hex: &str) -> Option<String> {
    let (r, g, b) = rgb_components(hex)?;
    Some(format!("{r}, {g}, {b}"))
}

/// Naive device CMYK as whole percentages: "c, m, y, k".
pub fn hex_to_cmyk(hex: &str) -> Option<String> {
    let (r, g, b) = rgb_components(hex)?;
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let k = 1.0 - r.max(g).max(b);
    if k >= 1.0 {
        return Some("0, 0, 0, 100".to_string());
    }
    let part = |c: f64| ((1.0 - c - k) / (1.0 - k) * 100.0).round() as u8;
    Some(format!(
        "{}, {}, {}, {}",
        part(r),
        part(g),
        part(b),
        (k * 100.0).round() as u8
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::NullStore;

    #[test]
    fn hex_conversions() {
        assert_eq!(normalize_hex("5b5fff").as_deref(), Some("#5B5FFF"));
        assert_eq!(normalize_hex("#fff").as_deref(), Some("#FFFFFF"));
        assert_eq!(normalize_hex("blue"), None);
        assert_eq!(hex_to_rgb("#5B5FFF").as_deref(), Some("91, 95, 255"));
        assert_eq!(hex_to_cmyk("#FF0000").as_deref(), Some("0, 100, 100, 0"));
        assert_eq!(hex_to_cmyk("#000000").as_deref(), Some("0, 0, 0, 100"));
    }

    #[test]
    fn defaults_when_nothing_resolves() {
        let registry = TeamRegistry::new();
        let cache = BrandingCache::new(&registry, &NullStore);
        let team = TeamIdentity::unresolved("Springfield", "General", None);
        let branding = cache.settle(&team, cache.lookup(&team), &ExtractedTeam::default(), false);
        assert_eq!(branding.source, BrandingSource::Default);
        assert_eq!(branding.primary_color, DEFAULT_PRIMARY_COLOR);
        assert_eq!(branding.secondary_color, DEFAULT_SECONDARY_COLOR);
        assert_eq!(branding.abbreviation.as_deref(), Some(DEFAULT_ABBREVIATION));
        assert_eq!(branding.conference.as_deref(), Some(DEFAULT_CONFERENCE));
    }

    #[test]
    fn discovered_colours_need_a_request() {
        let registry = TeamRegistry::new();
        let cache = BrandingCache::new(&registry, &NullStore);
        let team = TeamIdentity::unresolved("Springfield", "General", None);
        let extracted = ExtractedTeam {
            primary_color: Some("#123456".into()),
            ..ExtractedTeam::default()
        };
        assert_eq!(cache.settle(&team, None, &extracted, false).source, BrandingSource::Default);
        assert_eq!(cache.settle(&team, None, &extracted, true).source, BrandingSource::Discovered);
    }

    #[test]
    fn reported_print_values_override_derived_ones() {
        let registry = TeamRegistry::new();
        let cache = BrandingCache::new(&registry, &NullStore);
        let team = TeamIdentity::unresolved("Springfield", "General", None);
        let extracted = ExtractedTeam {
            primary_color: Some("#0a3161".into()),
            rgb: Some("10, 49, 98".into()),
            pantone: Some("PMS 282 C".into()),
            ..ExtractedTeam::default()
        };
        let branding = cache.settle(&team, None, &extracted, true);
        assert_eq!(branding.primary_rgb.as_deref(), Some("10, 49, 98"));
        assert_eq!(branding.pantone.as_deref(), Some("PMS 282 C"));
        assert_eq!(branding.secondary_rgb.as_deref(), Some("26, 26, 26"));

        let plain = ExtractedTeam { rgb: None, ..extracted };
        let derived = cache.settle(&team, None, &plain, true);
        assert_eq!(derived.primary_rgb.as_deref(), Some("10, 49, 97"));
    }
}
