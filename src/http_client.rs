use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
const AGENT: &str = concat!("roster_sync/", env!("CARGO_PKG_VERSION"));
const SNIPPET_CHARS: usize = 220;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared client with the default feed timeout.
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| build_client(Duration::from_secs(DEFAULT_TIMEOUT_SECS)))
}

pub fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(AGENT)
        .build()
        .context("failed to build http client")
}

/// Client for `timeout`, reusing the shared one when it matches the default.
pub fn client_for(timeout: Duration) -> Result<Client> {
    if timeout == Duration::from_secs(DEFAULT_TIMEOUT_SECS) {
        return http_client().cloned();
    }
    build_client(timeout)
}

/// GET `url` and return the body. Non-2xx responses become errors carrying
/// the status and the start of the body.
pub fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let resp = client
        .get(url)
        .header(USER_AGENT, AGENT)
        .header(ACCEPT, "application/json")
        .send()
        .context("request failed")?;
    let status = resp.status();
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("http {}: {}", status, snippet(&body)));
    }
    Ok(body)
}

pub fn snippet(body: &str) -> String {
    body.trim().chars().take(SNIPPET_CHARS).collect()
}
