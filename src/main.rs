use std::{error::Error, sync::Arc};

use ai_llm_service::{
    config::{
        default_config::{config_text, config_vision},
        model_variant::ModelVariant,
    },
    service_profiles::LlmServiceProfiles,
    telemetry,
};
use api::core::app_state::ServerConfig;
use tracing::{Level, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env is fine; the process environment is used as is.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .try_init()?;

    if let Err(e) = dotenv {
        warn!(error = %e, "no .env loaded");
    }

    let llm = Arc::new(LlmServiceProfiles::new(config_vision()?, config_text()?));
    let server = ServerConfig::from_env();

    info!(
        vision_model = %llm.profile(ModelVariant::Vision).model,
        text_model = %llm.profile(ModelVariant::Text).model,
        "starting nutrition backend"
    );

    api::start(server, llm).await?;

    Ok(())
}
