use serde_json::{Map, Value, json};

use crate::model::ExtractionMode;
use crate::tier::{Capability, SubscriptionTier, capabilities_for};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    AthleteList,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub description: Option<&'static str>,
}

impl FieldSpec {
    const fn text(name: &'static str, required: bool, description: Option<&'static str>) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            required,
            description,
        }
    }
}

/// Field schema handed to the extraction service: which athlete attributes
/// to fill, which are mandatory, plus root team/season/branding fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionContract {
    pub tier: SubscriptionTier,
    pub mode: ExtractionMode,
    pub branding: bool,
    pub athlete_fields: Vec<FieldSpec>,
    pub root_fields: Vec<FieldSpec>,
}

impl ExtractionContract {
    pub fn athlete_field(&self, name: &str) -> Option<&FieldSpec> {
        self.athlete_fields.iter().find(|f| f.name == name)
    }

    pub fn root_field(&self, name: &str) -> Option<&FieldSpec> {
        self.root_fields.iter().find(|f| f.name == name)
    }

    /// Renders the contract as an OpenAPI-style response schema.
    pub fn to_json_schema(&self) -> Value {
        let athlete = object_schema(&self.athlete_fields);
        let mut props = Map::new();
        let mut required = Vec::new();
        for field in &self.root_fields {
            let schema = match field.kind {
                FieldKind::String => string_schema(field.description),
                FieldKind::AthleteList => json!({ "type": "ARRAY", "items": athlete.clone() }),
            };
            props.insert(field.name.to_string(), schema);
            if field.required {
                required.push(Value::from(field.name));
            }
        }
        json!({ "type": "OBJECT", "properties": props, "required": required })
    }
}

fn object_schema(fields: &[FieldSpec]) -> Value {
    let mut props = Map::new();
    let mut required = Vec::new();
    for field in fields {
        props.insert(field.name.to_string(), string_schema(field.description));
        if field.required {
            required.push(Value::from(field.name));
        }
    }
    json!({ "type": "OBJECT", "properties": props, "required": required })
}

fn string_schema(description: Option<&str>) -> Value {
    match description {
        Some(d) => json!({ "type": "STRING", "description": d }),
        None => json!({ "type": "STRING" }),
    }
}

fn athlete_fields_for(capability: Capability, mode: ExtractionMode) -> Vec<FieldSpec> {
    let noc = mode == ExtractionMode::Noc;
    match capability {
        Capability::Name => vec![FieldSpec::text("fullName", true, None)],
        Capability::Jersey => vec![FieldSpec::text(
            "jerseyNumber",
            true,
            Some(if noc {
                "Bib number. Always use two digits (pad with 0 if needed)."
            } else {
                "Jersey number. Always use two digits (pad with 0 if needed)."
            }),
        )],
        Capability::Position => vec![FieldSpec::text(
            "position",
            true,
            Some(if noc {
                "Main sport/discipline (e.g. Swimming)."
            } else {
                "Player position."
            }),
        )],
        Capability::SafeDisplayName => vec![FieldSpec::text(
            "displayNameSafe",
            false,
            Some("Full name in UPPERCASE ASCII with accents removed."),
        )],
        Capability::Status => vec![FieldSpec::text(
            "nilStatus",
            true,
            Some("One of Active, Transfer, Alumni, Incoming."),
        )],
        Capability::PhoneticSimplified => vec![FieldSpec::text(
            "phoneticSimplified",
            false,
            Some("Simplified pronunciation with the stressed syllable in capitals."),
        )],
        Capability::PhoneticIpa => vec![FieldSpec::text(
            "phoneticIPA",
            false,
            Some("International Phonetic Alphabet transcription."),
        )],
        Capability::LocalizedNames => vec![
            FieldSpec::text("nameSpanish", false, None),
            FieldSpec::text("nameMandarin", false, None),
        ],
        Capability::Bio => vec![FieldSpec::text(
            "bioStats",
            false,
            Some("Summary of achievements or career stats."),
        )],
        Capability::SocialHandle => vec![FieldSpec::text(
            "socialHandle",
            false,
            Some("Likely social media handle (e.g. @name)."),
        )],
    }
}

/// Pure function of (tier, mode, branding flag).
pub fn build_contract(
    tier: SubscriptionTier,
    mode: ExtractionMode,
    find_branding: bool,
) -> ExtractionContract {
    let mut athlete_fields: Vec<FieldSpec> = capabilities_for(tier)
        .into_iter()
        .flat_map(|cap| athlete_fields_for(cap, mode))
        .collect();
    if mode == ExtractionMode::Noc {
        athlete_fields.push(FieldSpec::text(
            "countryCode",
            false,
            Some("3-letter IOC country code (e.g. JAM, USA)."),
        ));
        athlete_fields.push(FieldSpec::text(
            "event",
            false,
            Some("Specific event (e.g. 100m Butterfly)."),
        ));
    }

    let mut root_fields = vec![
        FieldSpec::text(
            "teamName",
            true,
            Some(if mode == ExtractionMode::Noc {
                "National Olympic Committee name (e.g. Team Jamaica)."
            } else {
                "Team name, or \"Unknown Team\" when it cannot be identified."
            }),
        ),
        FieldSpec::text("abbreviation", false, Some("3-letter team abbreviation.")),
        FieldSpec::text("sport", true, None),
        FieldSpec::text(
            "seasonYear",
            true,
            Some("Season year or range found in the text (e.g. '2025-26', '2026')."),
        ),
        FieldSpec::text("conference", false, None),
        FieldSpec::text("countryCode", false, Some("3-letter IOC country code.")),
        FieldSpec {
            name: "athletes",
            kind: FieldKind::AthleteList,
            required: true,
            description: None,
        },
    ];

    // Branding stays optional so the extractor never invents placeholder colours.
    if find_branding {
        root_fields.extend([
            FieldSpec::text("primaryColor", false, Some("Official primary hex colour.")),
            FieldSpec::text("secondaryColor", false, Some("Official secondary hex colour.")),
            FieldSpec::text("logoUrl", false, Some("Direct URL to the official team logo.")),
            FieldSpec::text("pantone", false, Some("Pantone reference of the primary colour.")),
            FieldSpec::text("cmyk", false, Some("CMYK values of the primary colour.")),
            FieldSpec::text("rgb", false, Some("RGB values of the primary colour.")),
        ]);
    }

    ExtractionContract {
        tier,
        mode,
        branding: find_branding,
        athlete_fields,
        root_fields,
    }
}
