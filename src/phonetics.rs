use std::collections::{HashMap, HashSet};

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::ExtractionError;
use crate::generative::{GenerationRequest, GenerativeClient};
use crate::json_repair::parse_lenient;
use crate::model::Athlete;
use crate::normalize::{clean_optional, normalize_name};
use crate::tier::{Capability, SubscriptionTier};
use crate::usage::CallUsage;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhoneticGuide {
    pub simplified: Option<String>,
    pub ipa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhoneticOutcome {
    pub requested: usize,
    pub filled: usize,
    pub usage: Option<CallUsage>,
}

/// Fills missing pronunciation guides on both lists with one batched call.
/// A failed call leaves the guides missing.
pub fn backfill_phonetics(
    client: &dyn GenerativeClient,
    tier: SubscriptionTier,
    athletes: &mut [Athlete],
    missing: &mut [Athlete],
) -> PhoneticOutcome {
    if !tier.permits(Capability::PhoneticSimplified) {
        return PhoneticOutcome::default();
    }
    let names = names_needing_guides(athletes.iter().chain(missing.iter()));
    if names.is_empty() {
        return PhoneticOutcome::default();
    }

    let with_ipa = tier.permits(Capability::PhoneticIpa);
    let request = build_request(&names, with_ipa);
    info!(names = names.len(), ipa = with_ipa, "requesting phonetic backfill");

    let response = match client.generate(&request) {
        Ok(r) => r,
        Err(err) => {
            warn!(error = %format!("{err:#}"), "phonetic backfill call failed");
            return PhoneticOutcome {
                requested: names.len(),
                ..PhoneticOutcome::default()
            };
        }
    };
    let usage = Some(CallUsage::from_response(client.model_name(), &response));

    let guides = match parse_guides(&response.text) {
        Ok(g) => g,
        Err(err) => {
            warn!(error = %err, "phonetic backfill response unusable");
            return PhoneticOutcome {
                requested: names.len(),
                filled: 0,
                usage,
            };
        }
    };

    let filled = athletes
        .iter_mut()
        .chain(missing.iter_mut())
        .map(|athlete| apply_guide(athlete, &guides, with_ipa))
        .filter(|applied| *applied)
        .count();
    info!(requested = names.len(), filled, "phonetic backfill merged");

    PhoneticOutcome {
        requested: names.len(),
        filled,
        usage,
    }
}

fn names_needing_guides<'a>(athletes: impl Iterator<Item = &'a Athlete>) -> Vec<String> {
    let mut seen = HashSet::new();
    athletes
        .filter(|a| a.needs_phonetic())
        .filter(|a| seen.insert(normalize_name(&a.full_name)))
        .map(|a| a.full_name.clone())
        .collect()
}

pub fn build_request(names: &[String], with_ipa: bool) -> GenerationRequest {
    let mut guide_props = json!({
        "name": { "type": "STRING" },
        "phoneticSimplified": {
            "type": "STRING",
            "description": "Simplified pronunciation with the stressed syllable in capitals (e.g. luh-BRON)."
        }
    });
    if with_ipa {
        guide_props["phoneticIPA"] = json!({ "type": "STRING" });
    }
    let schema = json!({
        "type": "OBJECT",
        "properties": {
            "guides": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": guide_props,
                    "required": ["name", "phoneticSimplified"]
                }
            }
        },
        "required": ["guides"]
    });
    GenerationRequest {
        system_instruction: "You write pronunciation guides for broadcast announcers. \
Return one guide per name, echoing each name exactly as given."
            .to_string(),
        prompt: format!("Names:\n{}", names.join("\n")),
        response_schema: Some(schema),
        use_search: false,
    }
}

/// Guides keyed by normalized name.
pub fn parse_guides(raw: &str) -> Result<HashMap<String, PhoneticGuide>, ExtractionError> {
    let (value, _) = parse_lenient(raw)?;
    let items = value
        .get("guides")
        .and_then(Value::as_array)
        .or_else(|| value.as_array())
        .cloned()
        .unwrap_or_default();

    let mut out = HashMap::new();
    for item in items {
        let text = |key: &str| clean_optional(item.get(key).and_then(Value::as_str));
        let Some(name) = text("name") else {
            continue;
        };
        let guide = PhoneticGuide {
            simplified: text("phoneticSimplified"),
            ipa: text("phoneticIPA"),
        };
        if guide.simplified.is_some() || guide.ipa.is_some() {
            out.insert(normalize_name(&name), guide);
        }
    }
    Ok(out)
}

fn apply_guide(athlete: &mut Athlete, guides: &HashMap<String, PhoneticGuide>, with_ipa: bool) -> bool {
    if !athlete.needs_phonetic() {
        return false;
    }
    let Some(guide) = guides.get(&normalize_name(&athlete.full_name)) else {
        return false;
    };
    let Some(simplified) = guide.simplified.clone() else {
        return false;
    };
    athlete.phonetic_simplified = Some(simplified);
    if with_ipa && athlete.phonetic_ipa.is_none() {
        athlete.phonetic_ipa = guide.ipa.clone();
    }
    true
}
