//! Shared test infrastructure.
//!
//! - Scripted language models standing in for the Gemini transport.
//! - `setup_test_db()` for model tests against a real Postgres. It returns
//!   `None` when `DATABASE_URL` is not set so those tests skip cleanly.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use deckgen::ai::{GenerateError, LanguageModel, TextRequest};
use deckgen::config::GeminiConfig;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const TEST_API_KEY: &str = "test-key";
pub const MINIMAL_DECK: &str = r#"{"title":"T","slides":[]}"#;

pub const SAMPLE_DECK: &str = r#"{
    "title": "Solar Power Basics",
    "slides": [
        {
            "heading": "What is solar power?",
            "bullet_points": ["Energy from sunlight", ["Photovoltaic", "Thermal"]],
            "key_message": "",
            "img_keywords": "solar panel"
        },
        {
            "heading": "Installing panels",
            "bullet_points": [">> Survey the roof", ">> Mount the rails", ">> Wire the inverter"],
            "key_message": "Plan before you drill",
            "img_keywords": "roof installation"
        },
        {
            "heading": "Key takeaways",
            "bullet_points": ["Solar is cheap", "Storage matters"],
            "key_message": "",
            "img_keywords": ""
        }
    ]
}"#;

pub fn gemini_config(api_key: Option<&str>) -> GeminiConfig {
    GeminiConfig {
        api_key: api_key.map(String::from),
        max_retries: 0,
        ..GeminiConfig::default()
    }
}

pub fn upstream_error(message: &str, retryable: bool) -> GenerateError {
    GenerateError::Upstream { message: message.to_string(), retryable }
}

// ============================================================================
// SCRIPTED MODELS
// ============================================================================

/// Returns the same reply on every call and records what it was sent.
pub struct FixedModel {
    reply: Result<String, GenerateError>,
    calls: AtomicUsize,
    requests: Mutex<Vec<(String, String, String)>>,
}

impl FixedModel {
    pub fn ok(reply: &str) -> Self {
        Self::with_reply(Ok(reply.to_string()))
    }

    pub fn failing(err: GenerateError) -> Self {
        Self::with_reply(Err(err))
    }

    fn with_reply(reply: Result<String, GenerateError>) -> Self {
        FixedModel {
            reply,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (api_key, model, prompt) of the most recent call.
    pub fn last_request(&self) -> Option<(String, String, String)> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LanguageModel for FixedModel {
    async fn complete(&self, request: &TextRequest<'_>) -> Result<String, GenerateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push((
            request.api_key.to_string(),
            request.model.to_string(),
            request.prompt.to_string(),
        ));
        self.reply.clone()
    }
}

/// Fails with `error` for the first `failures` calls, then answers `reply`.
pub struct FlakyModel {
    failures: usize,
    error: GenerateError,
    reply: String,
    calls: AtomicUsize,
}

impl FlakyModel {
    pub fn new(failures: usize, error: GenerateError, reply: &str) -> Self {
        FlakyModel {
            failures,
            error,
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LanguageModel for FlakyModel {
    async fn complete(&self, _request: &TextRequest<'_>) -> Result<String, GenerateError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            Err(self.error.clone())
        } else {
            Ok(self.reply.clone())
        }
    }
}

// ============================================================================
// DATABASE SETUP
// ============================================================================

pub struct TestDb {
    pool: PgPool,
}

impl TestDb {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `DATABASE_URL` and apply migrations.
///
/// Tests share one database, so every test creates its own user (with a
/// random Google subject) and only looks at rows it owns.
pub async fn setup_test_db() -> Option<TestDb> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            eprintln!("DATABASE_URL not set, skipping database test");
            return None;
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    deckgen::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some(TestDb { pool })
}
