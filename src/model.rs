//! Generative-model backend client.
//!
//! Every pipeline step funnels through [`TextGenerator::generate`]: one
//! blocking request, one text response. Failures carry a [`ModelError`] so
//! callers can tell a backend outage from a response they cannot use and
//! pick their own fallback policy; nothing in this module retries.

use crate::config::{self, GEMINI_API_KEY_ENV};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Instant;

const GENERATE_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// A blocking text-generation capability.
///
/// `parts` is an ordered list of prompt fragments sent as a single model
/// turn; most callers pass exactly one.
pub trait TextGenerator {
    fn generate(&self, parts: &[&str]) -> Result<String, ModelError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, parts: &[&str]) -> Result<String, ModelError> {
        (**self).generate(parts)
    }
}

/// Why a generation request produced no usable text.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Transport, auth, or quota failure reaching the backend.
    #[error("model backend request failed: {0}")]
    Backend(#[source] Box<ureq::Error>),
    /// The backend answered, but without generated text to return.
    #[error("model backend returned no usable text: {0}")]
    Malformed(String),
}

/// Client for the Gemini `generateContent` endpoint.
///
/// The API key is resolved once at construction; a missing key is a fatal
/// configuration error here, not a call-time failure.
#[derive(Clone)]
pub struct GeminiClient {
    agent: ureq::Agent,
    model: String,
    api_key: String,
}

// The credential stays out of Debug output.
impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
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

impl GeminiClient {
    /// Build a client for `model` with an explicit key.
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client reading the key from `GEMINI_API_KEY`.
    pub fn from_env(model: &str) -> Result<Self> {
        let api_key = config::require_api_key(GEMINI_API_KEY_ENV)
            .context("configure generative model client")?;
        Ok(Self::new(model, api_key))
    }

    /// Model name requests are issued against.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, parts: &[&str]) -> Result<String, ModelError> {
        let url = format!("{GENERATE_ENDPOINT}/{}:generateContent", self.model);
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: parts.iter().copied().map(|text| RequestPart { text }).collect(),
            }],
        };

        let start = Instant::now();
        let mut response = self
            .agent
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .send_json(&body)
            .map_err(|err| ModelError::Backend(Box::new(err)))?;
        let parsed: GenerateResponse = response
            .body_mut()
            .read_json()
            .map_err(|err| ModelError::Backend(Box::new(err)))?;

        let text = first_candidate_text(&parsed)
            .ok_or_else(|| ModelError::Malformed("response contained no candidates".to_string()))?;
        tracing::info!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            model = %self.model,
            prompt_parts = parts.len(),
            response_bytes = text.len(),
            "model call complete"
        );
        Ok(text)
    }
}

fn first_candidate_text(response: &GenerateResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    if content.parts.is_empty() {
        return None;
    }
    let mut text = String::new();
    for part in &content.parts {
        text.push_str(&part.text);
    }
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn joins_candidate_parts_in_order() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "},{"text":"world"}]}}]}"#,
        );
        assert_eq!(first_candidate_text(&response).unwrap(), "Hello, world");
    }

    #[test]
    fn empty_candidates_is_malformed() {
        let response = parse(r#"{"candidates":[]}"#);
        assert!(first_candidate_text(&response).is_none());
    }

    #[test]
    fn candidate_without_parts_is_malformed() {
        let response = parse(r#"{"candidates":[{"content":{"parts":[]}}]}"#);
        assert!(first_candidate_text(&response).is_none());
    }

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "one" }, RequestPart { text: "two" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"contents":[{"parts":[{"text":"one"},{"text":"two"}]}]})
        );
    }
}
