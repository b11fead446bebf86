//! Shared LLM service with two profiles: `vision` and `text`.
//!
//! - Lives in the same Tokio runtime as the application.
//! - Construct once, wrap in `Arc`, and pass clones to dependents.
//! - Lazily builds one HTTP client per profile and caches it.
//! - A missing API key is not a construction error: it surfaces as
//!   [`ConfigError::MissingApiKey`] from [`LlmServiceProfiles::ensure_credentials`]
//!   and from every call, so a misconfigured deployment still answers requests
//!   with a clear error.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::config::default_config::{config_text, config_vision};
//! use ai_llm_service::config::model_variant::ModelVariant;
//! use ai_llm_service::service_profiles::LlmServiceProfiles;
//! use ai_llm_service::services::chat_message::ChatMessage;
//!
//! # async fn run() -> Result<(), ai_llm_service::error_handler::AiLlmError> {
//! let svc = Arc::new(LlmServiceProfiles::new(config_vision()?, config_text()?));
//! let reply = svc
//!     .complete(ModelVariant::Text, &[ChatMessage::user_text("Hello")])
//!     .await?;
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

use crate::{
    config::{llm_model_config::LlmModelConfig, model_variant::ModelVariant},
    error_handler::{AiLlmError, ConfigError},
    services::{chat_message::ChatMessage, open_ai_service::OpenAiService},
};

/// Shared service that routes chat completions to the **vision** or **text** model.
pub struct LlmServiceProfiles {
    vision: LlmModelConfig,
    text: LlmModelConfig,

    clients: RwLock<HashMap<ModelVariant, Arc<OpenAiService>>>,
}

impl LlmServiceProfiles {
    /// Creates a new service from the two model configs.
    pub fn new(vision: LlmModelConfig, text: LlmModelConfig) -> Self {
        Self {
            vision,
            text,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Config for the given variant.
    pub fn profile(&self, variant: ModelVariant) -> &LlmModelConfig {
        match variant {
            ModelVariant::Vision => &self.vision,
            ModelVariant::Text => &self.text,
        }
    }

    /// Checks that both profiles carry an API key.
    ///
    /// # Errors
    /// Returns [`ConfigError::MissingApiKey`] when either profile lacks a key.
    pub fn ensure_credentials(&self) -> Result<(), AiLlmError> {
        if self.vision.has_api_key() && self.text.has_api_key() {
            Ok(())
        } else {
            Err(ConfigError::MissingApiKey.into())
        }
    }

    /// Runs one chat completion against the model selected by `variant`.
    ///
    /// # Errors
    /// Returns [`AiLlmError`] if the client cannot be built or the call fails.
    pub async fn complete(
        &self,
        variant: ModelVariant,
        messages: &[ChatMessage],
    ) -> Result<String, AiLlmError> {
        let cli = self.get_or_init(variant).await?;
        cli.chat(messages).await
    }

    /* --------------------- Internals --------------------- */

    async fn get_or_init(&self, variant: ModelVariant) -> Result<Arc<OpenAiService>, AiLlmError> {
        if let Some(cli) = self.clients.read().await.get(&variant).cloned() {
            return Ok(cli);
        }
        let mut w = self.clients.write().await;
        if let Some(cli) = w.get(&variant).cloned() {
            return Ok(cli);
        }
        let cli = Arc::new(OpenAiService::new(self.profile(variant).clone())?);
        w.insert(variant, cli.clone());
        Ok(cli)
    }
}
