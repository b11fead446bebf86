//! HTTP surface of the nutrition backend.

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use meal_analyzer::limits::MAX_BODY_BYTES;
use tokio::signal;
use tracing::{error, info};

pub mod core;
pub mod error_handler;
mod middleware_layer;
mod routes;

use ai_llm_service::service_profiles::LlmServiceProfiles;

use crate::{
    core::app_state::{AppState, ServerConfig},
    error_handler::AppError,
    middleware_layer::cors::cors_headers,
    routes::{
        analyze::analyze_route::{analyze_route, method_not_allowed, preflight},
        health_route::health,
    },
};

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/api/analyze",
            post(analyze_route)
                .options(preflight)
                .fallback(method_not_allowed)
                .layer(DefaultBodyLimit::max(MAX_BODY_BYTES)),
        )
        .route("/healthz", get(health))
        .layer(middleware::from_fn(cors_headers))
        .with_state(state)
}

/// Binds `config.address` and serves until Ctrl+C.
pub async fn start(config: ServerConfig, llm: Arc<LlmServiceProfiles>) -> Result<(), AppError> {
    if let Err(e) = llm.ensure_credentials() {
        error!(error = %e, "LLM_API_KEY is not set; every analysis request will fail");
    }

    let app = router(Arc::new(AppState::new(llm)));

    let listener = tokio::net::TcpListener::bind(&config.address)
        .await
        .map_err(|source| AppError::Bind {
            address: config.address.clone(),
            source,
        })?;

    info!(address = %config.address, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
