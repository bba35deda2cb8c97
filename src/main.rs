use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing_subscriber::EnvFilter;

use roster_sync::config::EngineConfig;
use roster_sync::engine::{ExtractionRequest, RosterEngine};
use roster_sync::league::League;
use roster_sync::model::ExtractionMode;
use roster_sync::tier::SubscriptionTier;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("roster_sync=info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let request = parse_request(&args)?;

    let engine = RosterEngine::from_config(EngineConfig::from_env())?;
    let result = engine.process(&request)?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn parse_request(args: &[String]) -> Result<ExtractionRequest> {
    let text = match arg_value(args, "--file") {
        Some(path) => {
            let path = PathBuf::from(path);
            fs::read_to_string(&path)
                .with_context(|| format!("failed reading {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed reading roster text from stdin")?;
            buf
        }
    };

    let tier = match arg_value(args, "--tier") {
        Some(raw) => SubscriptionTier::parse(&raw).ok_or_else(|| anyhow!("unknown tier {raw}"))?,
        None => SubscriptionTier::Basic,
    };
    let league_hint = match arg_value(args, "--league") {
        Some(raw) => Some(League::from_hint(&raw).ok_or_else(|| anyhow!("unknown league {raw}"))?),
        None => None,
    };
    let mode = if has_flag(args, "--noc") {
        ExtractionMode::Noc
    } else {
        ExtractionMode::Standard
    };

    Ok(ExtractionRequest {
        text,
        tier,
        mode,
        season_override: arg_value(args, "--season"),
        find_branding: has_flag(args, "--branding"),
        user_id: arg_value(args, "--user"),
        league_hint,
        manual_team: arg_value(args, "--team"),
    })
}

/// Accepts both `--name=value` and `--name value`.
fn arg_value(args: &[String], name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(v) = arg.strip_prefix(&prefix)
            && !v.trim().is_empty()
        {
            return Some(v.trim().to_string());
        }
        if arg == name
            && let Some(next) = args.get(idx + 1)
            && !next.trim().is_empty()
            && !next.starts_with("--")
        {
            return Some(next.trim().to_string());
        }
    }
    None
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}
