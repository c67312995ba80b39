//! Insight model clients.
//!
//! `InsightModel` abstracts the hosted language model; the Gemini client is
//! the production implementation and `StubModel` serves tests and offline
//! runs. Model output is parsed into an `AiResponse` here but is still
//! untrusted until the validator has passed it.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use verdex_core::{AiResponse, VerdexError};

/// A hosted model that turns a composed prompt into structured insight
#[async_trait]
pub trait InsightModel: Send + Sync {
    /// Short model label for logs and reports
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<AiResponse, VerdexError>;
}

/// Gemini generateContent client
pub struct GeminiModel {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiModel {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: verdex_core::config::GEMINI_API.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl InsightModel for GeminiModel {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, prompt: &str) -> Result<AiResponse, VerdexError> {
        let body: GenerateContentResponse = self
            .client
            .post(&self.endpoint)
            .timeout(Duration::from_secs(30))
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await
            .map_err(|e| VerdexError::InsightError(e.to_string()))?
            .error_for_status()
            .map_err(|e| VerdexError::InsightError(e.to_string()))?
            .json()
            .await
            .map_err(|e| VerdexError::InsightError(e.to_string()))?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .ok_or_else(|| VerdexError::InsightError("empty model response".to_string()))?;

        parse_response(text)
    }
}

/// Parse an `AiResponse` out of the model's free text.
///
/// Models wrap JSON in prose and code fences; take the outermost braced
/// block and parse that.
pub fn parse_response(text: &str) -> Result<AiResponse, VerdexError> {
    let json_block = extract_json(text)
        .ok_or_else(|| VerdexError::InsightError("no JSON object in model output".to_string()))?;

    serde_json::from_str(json_block)
        .map_err(|e| VerdexError::InsightError(format!("unparseable model output: {}", e)))
}

/// The outermost `{ ... }` block of a text, if any
pub fn extract_json(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

/// Deterministic model for tests and offline runs
pub struct StubModel {
    response: AiResponse,
}

impl StubModel {
    pub fn new(response: AiResponse) -> Self {
        Self { response }
    }
}

#[async_trait]
impl InsightModel for StubModel {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, _prompt: &str) -> Result<AiResponse, VerdexError> {
        Ok(self.response.clone())
    }
}
