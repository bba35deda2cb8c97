use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use serde_json::{Value, json};

use crate::config::EngineConfig;
use crate::http_client::{build_client, snippet};
use crate::model::VerificationSource;

/// One call to the text-generation service.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub response_schema: Option<Value>,
    pub use_search: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationResponse {
    pub text: String,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
    pub search_queries: u32,
    pub sources: Vec<VerificationSource>,
}

pub trait GenerativeClient: Send + Sync {
    fn model_name(&self) -> &str;
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;
}

/// Gemini `generateContent` over blocking reqwest.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &EngineConfig) -> Result<Option<Self>> {
        let Some(key) = config.api_key.as_deref() else {
            return Ok(None);
        };
        Self::new(key, &config.model, &config.base_url, config.generation_timeout).map(Some)
    }
}

impl GenerativeClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = request_body(request);
        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .context("generation request failed")?;
        let status = resp.status();
        let text = resp.text().context("failed reading generation body")?;
        if !status.is_success() {
            return Err(anyhow!("http {}: {}", status, snippet(&text)));
        }
        parse_generation_response(&text)
    }
}

/// Builds the REST payload. The service rejects a response schema alongside
/// the search tool, so with search on the schema rides in the prompt.
pub fn request_body(request: &GenerationRequest) -> Value {
    let mut prompt = request.prompt.clone();
    let mut body = json!({
        "systemInstruction": { "parts": [{ "text": request.system_instruction }] },
    });

    if request.use_search {
        if let Some(schema) = &request.response_schema {
            prompt.push_str("\n\nRespond with a single JSON object matching this schema:\n");
            prompt.push_str(&schema.to_string());
        }
        body["tools"] = json!([{ "googleSearch": {} }]);
    } else {
        let mut generation = json!({ "responseMimeType": "application/json" });
        if let Some(schema) = &request.response_schema {
            generation["responseSchema"] = schema.clone();
        }
        body["generationConfig"] = generation;
    }

    body["contents"] = json!([{ "role": "user", "parts": [{ "text": prompt }] }]);
    body
}

pub fn parse_generation_response(raw: &str) -> Result<GenerationResponse> {
    let root: Value = serde_json::from_str(raw.trim()).context("invalid generation json")?;
    let candidate = root
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|c| c.first())
        .ok_or_else(|| anyhow!("generation returned no candidates: {}", snippet(raw)))?;

    let text: String = candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    if text.trim().is_empty() {
        let reason = candidate
            .get("finishReason")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        return Err(anyhow!("generation returned no text (finish reason {reason})"));
    }

    let grounding = candidate.get("groundingMetadata");
    let search_queries = grounding
        .and_then(|g| g.get("webSearchQueries"))
        .and_then(Value::as_array)
        .map(|q| q.len() as u32)
        .unwrap_or(0);
    let sources = grounding
        .and_then(|g| g.get("groundingChunks"))
        .and_then(Value::as_array)
        .map(|chunks| {
            chunks
                .iter()
                .filter_map(|chunk| {
                    let web = chunk.get("web")?;
                    let uri = web.get("uri")?.as_str()?.trim();
                    if uri.is_empty() {
                        return None;
                    }
                    let title = web
                        .get("title")
                        .and_then(Value::as_str)
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .unwrap_or("Source");
                    Some(VerificationSource {
                        title: title.to_string(),
                        uri: uri.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let usage = root.get("usageMetadata");
    Ok(GenerationResponse {
        text,
        input_tokens: usage
            .and_then(|u| u.get("promptTokenCount"))
            .and_then(Value::as_u64),
        output_tokens: usage
            .and_then(|u| u.get("candidatesTokenCount"))
            .and_then(Value::as_u64),
        search_queries,
        sources,
    })
}
