//! Typed error for the meal-analyzer crate.
//!
//! Display strings are user-facing: the HTTP layer returns them verbatim in
//! the `{ "error": ... }` body. Upstream error bodies are never included;
//! an unparseable model reply is shown only as a trimmed snippet.

use ai_llm_service::error_handler::{AiLlmError, make_snippet};
use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

/// Which part of the request exceeded its size ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadPart {
    Body,
    Image,
}

impl std::fmt::Display for PayloadPart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PayloadPart::Body => "Request body",
            PayloadPart::Image => "Image",
        })
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    /// The model credential is not configured. Fatal for every request.
    #[error("Service misconfigured: the model API key is not set")]
    Configuration,

    /// Body or embedded image is above its ceiling.
    #[error(
        "{part} is too large ({actual} bytes, limit {limit} bytes). Please compress or resize the image and try again."
    )]
    PayloadTooLarge {
        part: PayloadPart,
        actual: usize,
        limit: usize,
    },

    /// The model call exceeded its deadline or never reached the provider.
    #[error("The model service timed out or could not be reached. Please try again.")]
    UpstreamTimeout,

    /// The provider answered with a non-success status. `body` is kept for logs only.
    #[error("The model service returned an error{}", status_suffix(.status))]
    UpstreamError { status: Option<u16>, body: String },

    /// Neither a direct parse nor block extraction yielded a JSON object.
    #[error("Model output could not be parsed as JSON: {}", make_snippet(.raw))]
    UnparseableResponse { raw: String },

    /// Body is not a valid JSON request object.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<AiLlmError> for AnalyzeError {
    fn from(err: AiLlmError) -> Self {
        if err.is_timeout_like() {
            return AnalyzeError::UpstreamTimeout;
        }
        match err {
            AiLlmError::Config(_) => AnalyzeError::Configuration,
            AiLlmError::HttpStatus { status, body, .. } => AnalyzeError::UpstreamError {
                status: Some(status.as_u16()),
                body,
            },
            AiLlmError::Decode(detail) => AnalyzeError::UnparseableResponse { raw: detail },
            AiLlmError::EmptyChoices => AnalyzeError::UnparseableResponse { raw: String::new() },
            other => AnalyzeError::UpstreamError {
                status: None,
                body: other.to_string(),
            },
        }
    }
}
