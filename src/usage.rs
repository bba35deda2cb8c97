use tracing::{debug, warn};

use crate::generative::GenerationResponse;
use crate::store::PersistedStore;

const SEARCH_QUERY_USD: f64 = 0.035;

/// USD per million (input, output) tokens.
const MODEL_PRICES: &[(&str, f64, f64)] = &[
    ("gemini-2.5-pro", 1.25, 10.0),
    ("gemini-2.5-flash-lite", 0.10, 0.40),
    ("gemini-2.5-flash", 0.30, 2.50),
    ("gemini-2.0-flash-lite", 0.075, 0.30),
    ("gemini-2.0-flash", 0.10, 0.40),
];
const FALLBACK_PRICE: (f64, f64) = (0.10, 0.40);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageOperation {
    RosterImport,
    PhoneticBackfill,
}

impl UsageOperation {
    pub fn as_str(self) -> &'static str {
        match self {
            UsageOperation::RosterImport => "ROSTER_IMPORT",
            UsageOperation::PhoneticBackfill => "PHONETIC_BACKFILL",
        }
    }
}

/// Token counts from one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallUsage {
    pub model: String,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub search_queries: u32,
}

impl CallUsage {
    pub fn from_response(model: &str, response: &GenerationResponse) -> Self {
        Self {
            model: model.to_string(),
            input_tokens: response.input_tokens,
            output_tokens: response.output_tokens,
            search_queries: response.search_queries,
        }
    }

    fn has_counts(&self) -> bool {
        self.input_tokens.is_some() || self.output_tokens.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UsageEvent {
    pub user_id: String,
    pub operation: String,
    pub model_name: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub search_queries: u32,
    pub total_cost_usd: f64,
}

pub fn cost_usd(model: &str, input_tokens: u64, output_tokens: u64, search_queries: u32) -> f64 {
    // longest prefix first so "flash-lite" is not priced as "flash"
    let (input_price, output_price) = MODEL_PRICES
        .iter()
        .find(|(name, _, _)| model.starts_with(name))
        .map(|(_, i, o)| (*i, *o))
        .unwrap_or(FALLBACK_PRICE);
    input_tokens as f64 / 1_000_000.0 * input_price
        + output_tokens as f64 / 1_000_000.0 * output_price
        + search_queries as f64 * SEARCH_QUERY_USD
}

/// Folds every call of one operation into a single event. `None` when no
/// call reported token counts.
pub fn summarize(
    user_id: &str,
    operation: UsageOperation,
    calls: &[CallUsage],
) -> Option<UsageEvent> {
    let counted: Vec<&CallUsage> = calls.iter().filter(|c| c.has_counts()).collect();
    let model_name = counted.last()?.model.clone();
    let mut event = UsageEvent {
        user_id: user_id.to_string(),
        operation: operation.as_str().to_string(),
        model_name,
        input_tokens: 0,
        output_tokens: 0,
        search_queries: 0,
        total_cost_usd: 0.0,
    };
    for call in counted {
        let input = call.input_tokens.unwrap_or(0);
        let output = call.output_tokens.unwrap_or(0);
        event.input_tokens += input;
        event.output_tokens += output;
        event.search_queries += call.search_queries;
        event.total_cost_usd += cost_usd(&call.model, input, output, call.search_queries);
    }
    Some(event)
}

/// Writes the usage row. Failures are logged and dropped.
pub fn record(
    store: &dyn PersistedStore,
    user_id: Option<&str>,
    operation: UsageOperation,
    calls: &[CallUsage],
) {
    let Some(user_id) = user_id.map(str::trim).filter(|u| !u.is_empty()) else {
        debug!(operation = operation.as_str(), "no user id, usage not recorded");
        return;
    };
    let Some(event) = summarize(user_id, operation, calls) else {
        return;
    };
    if let Err(err) = store.record_usage(&event) {
        warn!(operation = operation.as_str(), error = %format!("{err:#}"), "failed to record usage");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(model: &str, input: Option<u64>, output: Option<u64>, search: u32) -> CallUsage {
        CallUsage {
            model: model.into(),
            input_tokens: input,
            output_tokens: output,
            search_queries: search,
        }
    }

    #[test]
    fn lite_models_are_not_priced_as_flash() {
        let lite = cost_usd("gemini-2.5-flash-lite", 1_000_000, 0, 0);
        let flash = cost_usd("gemini-2.5-flash", 1_000_000, 0, 0);
        assert!((lite - 0.10).abs() < 1e-9);
        assert!((flash - 0.30).abs() < 1e-9);
    }

    #[test]
    fn search_queries_add_surcharge() {
        let cost = cost_usd("gemini-2.0-flash", 0, 0, 2);
        assert!((cost - 0.07).abs() < 1e-9);
    }

    #[test]
    fn summary_sums_attempts_and_skips_uncounted() {
        let calls = [
            call("gemini-2.0-flash", Some(1000), Some(200), 1),
            call("gemini-2.0-flash", None, None, 0),
            call("gemini-2.0-flash", Some(500), Some(100), 0),
        ];
        let event = summarize("u1", UsageOperation::RosterImport, &calls).expect("counted");
        assert_eq!(event.input_tokens, 1500);
        assert_eq!(event.output_tokens, 300);
        assert_eq!(event.search_queries, 1);
        assert_eq!(event.operation, "ROSTER_IMPORT");
    }

    #[test]
    fn nothing_to_record_without_counts() {
        assert!(summarize("u1", UsageOperation::PhoneticBackfill, &[call("m", None, None, 0)]).is_none());
    }
}
