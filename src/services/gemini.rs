// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Gemini API client.
//!
//! Handles:
//! - Single-shot `generateContent` calls with a fixed generation config
//! - Quota detection (429 / `RESOURCE_EXHAUSTED`)
//! - Credential failures (bad or missing API key)

use futures_util::future::BoxFuture;
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;

/// A text-in, text-out generative model.
///
/// Implemented by [`GeminiClient`] in production and by stubs in tests.
pub trait LanguageModel: Send + Sync {
    /// Send one prompt and return the raw text of the first candidate.
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AppError>>;
}

/// Gemini REST client.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiClient {
    /// Create a client for `model`. A missing key is reported on first use.
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key,
            model,
        }
    }

    /// Point the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::UpstreamAuth("GEMINI_API_KEY is not configured".to_string()))?;

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 8192
            }
        });

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "Calling Gemini");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Gemini response read failed: {}", e)))?;

        if !status.is_success() {
            return Err(classify_failure(status.as_u16(), &text));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| AppError::UpstreamInvalidResponse(format!("JSON parse error: {}", e)))?;

        let output = parsed.into_text()?;
        tracing::debug!(response_len = output.len(), "Gemini response received");
        Ok(output)
    }
}

impl LanguageModel for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, AppError>> {
        Box::pin(self.generate_content(prompt))
    }
}

/// Map a non-2xx provider response onto the error taxonomy.
fn classify_failure(status: u16, body: &str) -> AppError {
    let provider_status = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error.status)
        .unwrap_or_default();

    if status == 429 || provider_status == "RESOURCE_EXHAUSTED" {
        tracing::warn!("Gemini quota exhausted (429)");
        return AppError::QuotaExceeded;
    }

    if status == 401
        || status == 403
        || (status == 400 && (body.contains("API key") || body.contains("API_KEY_INVALID")))
    {
        return AppError::UpstreamAuth(format!("HTTP {}: {}", status, body));
    }

    AppError::Upstream(format!("HTTP {}: {}", status, body))
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    fn into_text(self) -> Result<String, AppError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(AppError::UpstreamInvalidResponse(format!(
                "prompt blocked: {}",
                reason
            )));
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| AppError::UpstreamInvalidResponse("no candidates".to_string()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::UpstreamInvalidResponse(format!(
                "empty candidate (finishReason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(text)
    }
}
