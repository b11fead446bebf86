//! Default LLM configs loaded from environment variables.
//!
//! Two roles are provided, both talking to the same OpenAI-compatible API:
//!
//! - **Vision** → multimodal model used when the request carries an image
//! - **Text**   → text-only model used otherwise
//!
//! These constructors are meant to be called once at startup; the resulting
//! [`LlmModelConfig`] values are injected into the service.
//!
//! # Environment variables
//!
//! - `LLM_API_KEY`      = bearer credential (optional here; a missing key is
//!   reported per request as a misconfiguration)
//! - `LLM_BASE_URL`     = API base, default `https://api.openai.com/v1`
//! - `LLM_VISION_MODEL` = image-capable model, default `gpt-4o-mini`
//! - `LLM_TEXT_MODEL`   = text-only model, default `gpt-4o-mini`
//! - `LLM_MAX_TOKENS`   = default `1000`
//! - `LLM_TEMPERATURE`  = default `0.2`, must lie in `0.0..=2.0`
//! - `LLM_TIMEOUT_SECS` = default `25`

use crate::{
    config::{llm_model_config::LlmModelConfig, model_variant::ModelVariant},
    error_handler::{
        AiLlmError, ConfigError, env_opt, env_opt_f32, env_opt_u32, env_opt_u64,
        validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_TIMEOUT_SECS: u64 = 25;

/// Constructs the config for the **vision** model.
///
/// # Env
/// - `LLM_VISION_MODEL` (optional)
///
/// # Errors
/// See [`shared_config`].
pub fn config_vision() -> Result<LlmModelConfig, AiLlmError> {
    let model = env_opt("LLM_VISION_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    shared_config(ModelVariant::Vision, model)
}

/// Constructs the config for the **text-only** model.
///
/// # Env
/// - `LLM_TEXT_MODEL` (optional)
///
/// # Errors
/// See [`shared_config`].
pub fn config_text() -> Result<LlmModelConfig, AiLlmError> {
    let model = env_opt("LLM_TEXT_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    shared_config(ModelVariant::Text, model)
}

/// Reads the settings common to both roles.
///
/// # Errors
///
/// - [`ConfigError::InvalidFormat`] if `LLM_BASE_URL` is not http(s)
/// - [`ConfigError::InvalidNumber`] for unparsable numeric variables
/// - [`ConfigError::OutOfRange`] if `LLM_TEMPERATURE` is outside `0.0..=2.0`
/// - [`ConfigError::EmptyModel`] if the model name is blank
fn shared_config(variant: ModelVariant, model: String) -> Result<LlmModelConfig, AiLlmError> {
    let endpoint = env_opt("LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    validate_http_endpoint("LLM_BASE_URL", &endpoint)?;

    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let temperature = env_opt_f32("LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;

    Ok(LlmModelConfig {
        variant,
        model,
        endpoint,
        api_key: env_opt("LLM_API_KEY"),
        max_tokens: Some(env_opt_u32("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS)),
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(env_opt_u64("LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}
