use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const DEFAULT_FEED_TIMEOUT_SECS: u64 = 10;
const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 90;
const DEFAULT_SEARCH_TOOL_BUDGET: u32 = 3;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub feed_timeout: Duration,
    pub generation_timeout: Duration,
    pub search_tool_budget: u32,
    pub feeds_enabled: bool,
    pub db_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            feed_timeout: Duration::from_secs(DEFAULT_FEED_TIMEOUT_SECS),
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
            search_tool_budget: DEFAULT_SEARCH_TOOL_BUDGET,
            feeds_enabled: true,
            db_path: default_db_path(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let api_key = env_string("GEMINI_API_KEY").or_else(|| env_string("API_KEY"));
        let model = env_string("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = env_string("GEMINI_BASE_URL")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let feed_timeout_secs = env::var("ROSTER_FEED_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_FEED_TIMEOUT_SECS)
            .clamp(1, 60);
        let generation_timeout_secs = env::var("ROSTER_GENERATION_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(DEFAULT_GENERATION_TIMEOUT_SECS)
            .clamp(10, 300);
        let search_tool_budget = env::var("ROSTER_SEARCH_TOOL_BUDGET")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_SEARCH_TOOL_BUDGET)
            .min(10);
        let feeds_enabled = env_bool("ROSTER_FEEDS_ENABLED", true);
        let db_path = env_string("ROSTER_DB_PATH")
            .map(PathBuf::from)
            .or_else(default_db_path);

        Self {
            api_key,
            model,
            base_url,
            feed_timeout: Duration::from_secs(feed_timeout_secs),
            generation_timeout: Duration::from_secs(generation_timeout_secs),
            search_tool_budget,
            feeds_enabled,
            db_path,
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .map(|v| {
            let t = v.trim().to_ascii_lowercase();
            !(t.is_empty() || t == "0" || t == "false" || t == "off" || t == "no")
        })
        .unwrap_or(default)
}

fn default_db_path() -> Option<PathBuf> {
    let base = env::var("XDG_CACHE_HOME")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var("HOME").ok().map(|h| PathBuf::from(h).join(".cache")))?;
    Some(base.join("roster_sync").join("roster_sync.sqlite"))
}
