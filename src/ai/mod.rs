pub mod client;
pub mod generator;
pub mod prompt;

use std::fmt;

pub use client::{GeminiClient, LanguageModel, TextRequest};
pub use generator::ContentGenerator;

/// Failure of a generation call.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// No usable credential or client setup; nothing was sent.
    Config(String),
    /// The outbound call failed (transport, auth, quota, timeout, HTTP status).
    Upstream { message: String, retryable: bool },
    /// The model answered without any text.
    EmptyResponse,
    /// The text did not match the deck shape.
    InvalidOutput(String),
}

impl GenerateError {
    /// Stable machine-readable kind, used as the `error` field of API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerateError::Config(_) => "configuration",
            GenerateError::Upstream { .. } => "upstream",
            GenerateError::EmptyResponse => "empty_response",
            GenerateError::InvalidOutput(_) => "invalid_output",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerateError::Upstream { retryable: true, .. })
    }
}

impl fmt::Display for GenerateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateError::Config(e) => write!(f, "Configuration error: {e}"),
            GenerateError::Upstream { message, .. } => write!(f, "Error during API request: {message}"),
            GenerateError::EmptyResponse => write!(f, "Error: No content generated."),
            GenerateError::InvalidOutput(e) => write!(f, "Invalid upstream output: {e}"),
        }
    }
}

impl std::error::Error for GenerateError {}
