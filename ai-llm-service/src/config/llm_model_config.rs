use crate::config::model_variant::ModelVariant;

/// Configuration for one chat-completions model.
///
/// # Fields
///
/// - `variant`: Which role this model plays (vision or text-only).
/// - `model`: The model identifier (e.g., `"gpt-4o-mini"`).
/// - `endpoint`: Base URL of the OpenAI-compatible API, without `/chat/completions`.
/// - `api_key`: Bearer credential. `None` means the service is misconfigured;
///   this is reported when a call is attempted, not at startup.
/// - `max_tokens`: Maximum number of tokens to generate.
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff (alternative to temperature).
/// - `timeout_secs`: Hard ceiling for a single call, in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::config::{llm_model_config::LlmModelConfig, model_variant::ModelVariant};
///
/// let cfg = LlmModelConfig {
///     variant: ModelVariant::Vision,
///     model: "gpt-4o-mini".to_string(),
///     endpoint: "https://api.openai.com/v1".to_string(),
///     api_key: Some("sk-...".to_string()),
///     max_tokens: Some(1000),
///     temperature: Some(0.2),
///     top_p: None,
///     timeout_secs: Some(25),
/// };
/// assert!(cfg.has_api_key());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    /// Vision or text-only role.
    pub variant: ModelVariant,

    /// Model identifier string.
    pub model: String,

    /// Base URL of the OpenAI-compatible API.
    pub endpoint: String,

    /// Optional API key for bearer authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature.
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// `true` when a non-blank API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}
