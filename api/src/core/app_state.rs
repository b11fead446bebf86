use std::sync::Arc;

use ai_llm_service::{error_handler::env_opt, service_profiles::LlmServiceProfiles};

/// Default bind address when `API_ADDRESS` is unset.
pub const DEFAULT_API_ADDRESS: &str = "0.0.0.0:8787";

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Model router used by the analysis pipeline.
    pub llm: Arc<LlmServiceProfiles>,
}

impl AppState {
    pub fn new(llm: Arc<LlmServiceProfiles>) -> Self {
        Self { llm }
    }
}

/// Server-level settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:8787`.
    pub address: String,
}

impl ServerConfig {
    /// Load from environment variables with defaults.
    pub fn from_env() -> Self {
        Self {
            address: env_opt("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.to_string()),
        }
    }
}
