use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::GenerateError;
use crate::config::GeminiConfig;

/// A single non-streamed text completion request.
#[derive(Debug, Clone)]
pub struct TextRequest<'a> {
    pub api_key: &'a str,
    pub model: &'a str,
    pub prompt: &'a str,
}

/// Transport to a generative-language service.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Send one prompt and return the model's text reply.
    async fn complete(&self, request: &TextRequest<'_>) -> Result<String, GenerateError>;
}

/// Google Gemini REST client (`models/{model}:generateContent`).
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &GeminiConfig) -> Result<Self, GenerateError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerateError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(GeminiClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn complete(&self, request: &TextRequest<'_>) -> Result<String, GenerateError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: request.prompt }],
            }],
        };

        let resp = self
            .http
            .post(self.endpoint(request.model))
            .header("x-goog-api-key", request.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Upstream {
                message: e.to_string(),
                retryable: e.is_timeout() || e.is_connect() || e.is_request(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(GenerateError::Upstream {
                message: format!("HTTP {status}: {}", text.trim()),
                retryable: status.as_u16() == 429 || status.is_server_error(),
            });
        }

        let parsed: GenerateContentResponse = resp.json().await.map_err(|e| GenerateError::Upstream {
            message: format!("Malformed response envelope: {e}"),
            retryable: false,
        })?;

        extract_text(parsed)
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GenerateError> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(GenerateError::Upstream {
            message: format!("Prompt blocked: {reason}"),
            retryable: false,
        });
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GenerateError::EmptyResponse);
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        if let Some(reason) = candidate.finish_reason {
            log::warn!("Model returned no text (finish reason: {reason})");
        }
        return Err(GenerateError::EmptyResponse);
    }

    Ok(text)
}
