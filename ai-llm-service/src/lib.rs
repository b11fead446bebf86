//! Outbound LLM access for the nutrition backend.
//!
//! - [`config`]: model configs (vision/text) and env-driven defaults
//! - [`services`]: OpenAI-compatible chat-completions client and message types
//! - [`service_profiles`]: shared router picking the model per request
//! - [`error_handler`]: unified [`error_handler::AiLlmError`]
//! - [`telemetry`]: tracing layer for the workspace crates

pub mod config;
pub mod error_handler;
pub mod service_profiles;
pub mod services;
pub mod telemetry;
