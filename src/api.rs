//! Text-generation API client for Gemini integration
//!
//! This module provides the [`TextGenerator`] seam the assistant depends on
//! and [`GeminiClient`], its HTTP implementation against the Gemini
//! `generateContent` endpoint. Each call sends exactly one request; failures
//! are classified and returned, never retried.

use std::fmt;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};

use crate::config::GeminiConfig;
use crate::error::WeatherAiError;
use crate::prompt::GeneratedPrompt;

/// Opaque API credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials(String);

impl Credentials {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key for the transport layer
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(****)")
    }
}

/// Text returned by a generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedText {
    pub text: String,
}

/// External text-generation collaborator
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate prose for the prompt. One call, one request.
    async fn generate(
        &self,
        prompt: &GeneratedPrompt,
        credentials: &Credentials,
    ) -> crate::Result<GeneratedText>;

    /// Model identifier shown in report footers
    fn model(&self) -> &str;
}

/// Gemini `generateContent` client
pub struct GeminiClient {
    /// HTTP client
    client: Client,
    /// API root, e.g. `https://generativelanguage.googleapis.com/v1beta`
    base_url: String,
    /// Model name, e.g. `gemini-2.0-flash`
    model: String,
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: &GeminiConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("WeatherAI/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    /// Use a different model than the configured one
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url,
            urlencoding::encode(&self.model)
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    #[instrument(skip(self, prompt, credentials), fields(model = %self.model))]
    async fn generate(
        &self,
        prompt: &GeneratedPrompt,
        credentials: &Credentials,
    ) -> crate::Result<GeneratedText> {
        let start_time = Instant::now();
        let url = self.endpoint();
        debug!("Gemini request URL: {}", url);

        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.as_str().to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", credentials.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Gemini request failed: {}", e);
                WeatherAiError::from(e)
            })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let err = classify_failure(status.as_u16(), &raw);
            warn!("Gemini request rejected: {}", err);
            return Err(err);
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            WeatherAiError::api(None, format!("Invalid response from Gemini API: {e}"))
        })?;

        let text = parsed.first_text().ok_or_else(|| {
            let reason = parsed
                .prompt_feedback
                .and_then(|feedback| feedback.block_reason)
                .map(|reason| format!(" (blocked: {reason})"))
                .unwrap_or_default();
            WeatherAiError::api(None, format!("Gemini returned an empty response{reason}"))
        })?;

        let total_duration = start_time.elapsed();
        info!(
            "Generated {} characters in {:.3}s",
            text.len(),
            total_duration.as_secs_f64()
        );
        if total_duration.as_secs() > 20 {
            warn!("Slow generation detected: {:.3}s", total_duration.as_secs_f64());
        }

        Ok(GeneratedText { text })
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Map a non-success response to the error taxonomy.
///
/// Gemini reports an invalid key as HTTP 400 with reason `API_KEY_INVALID`,
/// so that case is treated as an authentication failure too.
fn classify_failure(code: u16, raw_body: &str) -> WeatherAiError {
    let message = serde_json::from_str::<ErrorEnvelope>(raw_body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            if raw_body.trim().is_empty() {
                format!("HTTP {code}")
            } else {
                raw_body.trim().to_string()
            }
        });

    if code == 400 && raw_body.contains("API_KEY_INVALID") {
        return WeatherAiError::Auth { code, message };
    }
    WeatherAiError::from_status(code, message)
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any
    fn first_text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|part| part.text.as_str()).collect();
        if text.trim().is_empty() { None } else { Some(text) }
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}
