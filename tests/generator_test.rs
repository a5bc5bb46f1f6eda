//! Content generator behavior against scripted transports.

mod common;

use std::sync::Arc;
use std::time::Duration;

use deckgen::ai::{ContentGenerator, GenerateError};
use deckgen::config::GeminiConfig;
use deckgen::models::deck::SlideKind;

use common::*;

fn generator_with(config: GeminiConfig, model: Arc<dyn deckgen::ai::LanguageModel>) -> ContentGenerator {
    ContentGenerator::new(config, model).with_retry_backoff(Duration::ZERO)
}

// ---------------------------------------------------------------------------
// Fence stripping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_fenced_reply_is_stripped_exactly() {
    let model = Arc::new(FixedModel::ok("```json {\"title\":\"T\",\"slides\":[]} ```"));
    let generator = generator_with(gemini_config(Some(TEST_API_KEY)), model.clone());

    let out = generator.generate("Anything").await.expect("generate");
    assert_eq!(out, MINIMAL_DECK);
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_output_never_starts_or_ends_with_fence() {
    let replies = [
        format!("```json\n{SAMPLE_DECK}\n```"),
        format!("\n\n```\n{SAMPLE_DECK}\n```\n"),
        format!("  {SAMPLE_DECK}  "),
    ];
    for topic in ["Solar", "A much longer topic about the history of photovoltaics"] {
        for reply in &replies {
            let model = Arc::new(FixedModel::ok(reply));
            let generator = generator_with(gemini_config(Some(TEST_API_KEY)), model);
            let out = generator.generate(topic).await.expect("generate");
            assert!(!out.starts_with("```"), "leading fence in {out:?}");
            assert!(!out.ends_with("```"), "trailing fence in {out:?}");
            assert_eq!(out, SAMPLE_DECK.trim());
        }
    }
}

#[tokio::test]
async fn test_only_fences_is_empty_response() {
    let model = Arc::new(FixedModel::ok("```json\n```"));
    let generator = generator_with(gemini_config(Some(TEST_API_KEY)), model);

    let err = generator.generate("Solar").await.unwrap_err();
    assert_eq!(err, GenerateError::EmptyResponse);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_missing_credential_fails_before_any_call() {
    let model = Arc::new(FixedModel::ok(MINIMAL_DECK));
    let generator = generator_with(gemini_config(None), model.clone());

    assert!(!generator.is_configured());
    let err = generator.generate("Solar").await.unwrap_err();
    assert!(matches!(err, GenerateError::Config(_)));
    assert_eq!(err.kind(), "configuration");
    assert_eq!(model.calls(), 0, "transport must not be called without a key");
}

#[tokio::test]
async fn test_blank_credential_counts_as_missing() {
    let model = Arc::new(FixedModel::ok(MINIMAL_DECK));
    let generator = generator_with(gemini_config(Some("   ")), model.clone());

    let err = generator.suggest_deck_title("Solar").await.unwrap_err();
    assert!(matches!(err, GenerateError::Config(_)));
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn test_request_carries_key_model_and_topic() {
    let model = Arc::new(FixedModel::ok(MINIMAL_DECK));
    let config = GeminiConfig {
        model: "gemini-test".to_string(),
        ..gemini_config(Some(TEST_API_KEY))
    };
    let generator = generator_with(config, model.clone());

    generator.generate("Tidal energy in Norway").await.expect("generate");

    let (key, model_name, prompt) = model.last_request().expect("one request");
    assert_eq!(key, TEST_API_KEY);
    assert_eq!(model_name, "gemini-test");
    assert!(prompt.contains("### Topic:\nTidal energy in Norway"));
}

// ---------------------------------------------------------------------------
// Upstream failures and retries
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_transport_error_is_returned_not_raised() {
    let model = Arc::new(FixedModel::failing(upstream_error("quota exceeded", false)));
    let generator = generator_with(gemini_config(Some(TEST_API_KEY)), model.clone());

    let err = generator.generate("Solar").await.unwrap_err();
    assert!(err.to_string().starts_with("Error during API request:"));
    assert!(err.to_string().contains("quota exceeded"));
    assert_eq!(err.kind(), "upstream");
    assert_eq!(model.calls(), 1);
}

#[tokio::test]
async fn test_retryable_error_is_retried_up_to_limit() {
    let model = Arc::new(FixedModel::failing(upstream_error("HTTP 503", true)));
    let config = GeminiConfig {
        max_retries: 2,
        ..gemini_config(Some(TEST_API_KEY))
    };
    let generator = generator_with(config, model.clone());

    let err = generator.generate("Solar").await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(model.calls(), 3, "one attempt plus two retries");
}

#[tokio::test]
async fn test_transient_failure_then_success() {
    let model = Arc::new(FlakyModel::new(1, upstream_error("HTTP 429", true), MINIMAL_DECK));
    let config = GeminiConfig {
        max_retries: 2,
        ..gemini_config(Some(TEST_API_KEY))
    };
    let generator = generator_with(config, model.clone());

    let out = generator.generate("Solar").await.expect("second attempt succeeds");
    assert_eq!(out, MINIMAL_DECK);
    assert_eq!(model.calls(), 2);
}

#[tokio::test]
async fn test_non_retryable_error_is_not_retried() {
    let model = Arc::new(FixedModel::failing(upstream_error("HTTP 401", false)));
    let config = GeminiConfig {
        max_retries: 5,
        ..gemini_config(Some(TEST_API_KEY))
    };
    let generator = generator_with(config, model.clone());

    generator.generate("Solar").await.unwrap_err();
    assert_eq!(model.calls(), 1);
}

// ---------------------------------------------------------------------------
// Output validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_truncated_json_is_invalid_output_when_validating() {
    let model = Arc::new(FixedModel::ok("```json\n{\"title\": \"Solar\", \"slides\": [{\"head"));
    let generator = generator_with(gemini_config(Some(TEST_API_KEY)), model);

    let err = generator.generate("Solar").await.unwrap_err();
    assert!(matches!(err, GenerateError::InvalidOutput(_)));
    assert_eq!(err.kind(), "invalid_output");
}

#[tokio::test]
async fn test_truncated_json_passes_through_without_validation() {
    let truncated = "{\"title\": \"Solar\", \"slides\": [{\"head";
    let model = Arc::new(FixedModel::ok(&format!("```json\n{truncated}\n```")));
    let config = GeminiConfig {
        validate_output: false,
        ..gemini_config(Some(TEST_API_KEY))
    };
    let generator = generator_with(config, model);

    let out = generator.generate("Solar").await.expect("passthrough");
    assert_eq!(out, truncated);
}

#[tokio::test]
async fn test_valid_output_is_returned_verbatim() {
    let model = Arc::new(FixedModel::ok(SAMPLE_DECK));
    let generator = generator_with(gemini_config(Some(TEST_API_KEY)), model);

    let out = generator.generate("Solar").await.expect("generate");
    assert_eq!(out, SAMPLE_DECK.trim(), "validation must not reformat the text");
}

#[tokio::test]
async fn test_generate_deck_parses_slides() {
    let model = Arc::new(FixedModel::ok(SAMPLE_DECK));
    let generator = generator_with(gemini_config(Some(TEST_API_KEY)), model);

    let deck = generator.generate_deck("Solar").await.expect("deck");
    assert_eq!(deck.title, "Solar Power Basics");
    assert_eq!(deck.slides.len(), 3);
    assert_eq!(deck.slides[1].kind(), SlideKind::Process);
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_repeated_calls_yield_identical_output() {
    let model = Arc::new(FixedModel::ok(&format!("```json\n{SAMPLE_DECK}\n```")));
    let generator = generator_with(gemini_config(Some(TEST_API_KEY)), model.clone());

    let first = generator.generate("Solar").await.expect("first");
    let second = generator.generate("Solar").await.expect("second");
    assert_eq!(first, second);
    assert_eq!(model.calls(), 2);
}

// ---------------------------------------------------------------------------
// Title suggestions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_deck_title_is_cleaned() {
    let model = Arc::new(FixedModel::ok("\"Harnessing the Sun\"\n"));
    let generator = generator_with(gemini_config(Some(TEST_API_KEY)), model.clone());

    let title = generator.suggest_deck_title("Solar power").await.expect("title");
    assert_eq!(title, "Harnessing the Sun");

    let (_, _, prompt) = model.last_request().expect("request");
    assert!(prompt.contains("Solar power"));
}

#[tokio::test]
async fn test_slide_title_prompt_lists_existing_headings() {
    let model = Arc::new(FixedModel::ok("Grid Integration"));
    let generator = generator_with(gemini_config(Some(TEST_API_KEY)), model.clone());

    let headings = vec!["Intro".to_string(), "Costs".to_string()];
    let title = generator
        .suggest_slide_title("Solar Power Basics", &headings)
        .await
        .expect("title");
    assert_eq!(title, "Grid Integration");

    let (_, _, prompt) = model.last_request().expect("request");
    assert!(prompt.contains("Solar Power Basics"));
    assert!(prompt.contains("1. Intro"));
    assert!(prompt.contains("2. Costs"));
}

#[tokio::test]
async fn test_blank_title_is_empty_response() {
    let model = Arc::new(FixedModel::ok("  \n  "));
    let generator = generator_with(gemini_config(Some(TEST_API_KEY)), model);

    let err = generator.suggest_deck_title("Solar").await.unwrap_err();
    assert_eq!(err, GenerateError::EmptyResponse);
}
