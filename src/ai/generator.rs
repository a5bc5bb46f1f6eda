use std::sync::Arc;
use std::time::Duration;

use super::client::{GeminiClient, LanguageModel, TextRequest};
use super::prompt;
use super::GenerateError;
use crate::config::GeminiConfig;
use crate::models::deck::{Deck, SlideKind};

const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Turns topics into slide-deck JSON through a language model.
///
/// Holds no per-call state: the same model reply always yields the same
/// result.
pub struct ContentGenerator {
    config: GeminiConfig,
    model: Arc<dyn LanguageModel>,
    retry_backoff: Duration,
}

impl ContentGenerator {
    pub fn new(config: GeminiConfig, model: Arc<dyn LanguageModel>) -> Self {
        ContentGenerator {
            config,
            model,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }

    /// Generator backed by the Gemini REST API.
    pub fn gemini(config: GeminiConfig) -> Result<Self, GenerateError> {
        let client = GeminiClient::new(&config)?;
        Ok(Self::new(config, Arc::new(client)))
    }

    /// Base delay between retries; attempt `n` waits `n * backoff`.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    /// Generate slide-deck JSON for `topic`.
    ///
    /// Returns the model's text with code fences and outer whitespace
    /// removed. With output validation on, the text must parse as a [`Deck`].
    pub async fn generate(&self, topic: &str) -> Result<String, GenerateError> {
        let slide_prompt = prompt::build_slide_prompt(topic);
        log::debug!("Slide prompt built ({} chars)", slide_prompt.len());

        let raw = self.complete(&slide_prompt).await?;
        let content = prompt::strip_code_fences(&raw);
        if content.is_empty() {
            return Err(GenerateError::EmptyResponse);
        }

        if self.config.validate_output {
            let deck = Deck::parse(&content)
                .map_err(|e| GenerateError::InvalidOutput(e.to_string()))?;
            log::debug!(
                "Generated deck '{}': {} slides, {} icon, {} process, {} double-column",
                deck.title,
                deck.slides.len(),
                deck.count_kind(SlideKind::Icon),
                deck.count_kind(SlideKind::Process),
                deck.count_kind(SlideKind::DoubleColumn),
            );
        }

        Ok(content)
    }

    /// Generate and parse a deck. Parsing always happens here, whatever the
    /// validation setting.
    pub async fn generate_deck(&self, topic: &str) -> Result<Deck, GenerateError> {
        let content = self.generate(topic).await?;
        Deck::parse(&content).map_err(|e| GenerateError::InvalidOutput(e.to_string()))
    }

    /// Suggest a presentation title for a topic.
    pub async fn suggest_deck_title(&self, topic: &str) -> Result<String, GenerateError> {
        self.suggest_title(&prompt::build_deck_title_prompt(topic)).await
    }

    /// Suggest a title for the slide that follows `headings` in a deck.
    pub async fn suggest_slide_title(
        &self,
        deck_title: &str,
        headings: &[String],
    ) -> Result<String, GenerateError> {
        self.suggest_title(&prompt::build_slide_title_prompt(deck_title, headings))
            .await
    }

    async fn suggest_title(&self, title_prompt: &str) -> Result<String, GenerateError> {
        let raw = self.complete(title_prompt).await?;
        let title = prompt::clean_title(&raw);
        if title.is_empty() {
            return Err(GenerateError::EmptyResponse);
        }
        Ok(title)
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }

    async fn complete(&self, text: &str) -> Result<String, GenerateError> {
        let api_key = self
            .api_key()
            .ok_or_else(|| GenerateError::Config("GEMINI_API environment variable is not set.".to_string()))?;

        let request = TextRequest {
            api_key,
            model: &self.config.model,
            prompt: text,
        };

        let mut attempt = 0;
        loop {
            match self.model.complete(&request).await {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    log::warn!(
                        "Generation failed, retry {attempt}/{}: {e}",
                        self.config.max_retries
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
