//! Meal recognition pipeline with a single public entry point.
//!
//! Public API: [`analyze`]. It checks the credential, builds the identify or
//! revise prompt, makes one bounded model call through
//! [`LlmServiceProfiles`], and normalizes the reply into a [`NormalizedResult`]
//! whose totals are recomputed locally.

pub mod errors;
pub mod extract;
pub mod limits;
pub mod model;
pub mod normalize;
pub mod prompt;
pub mod request;

pub use errors::{AnalyzeError, AnalyzeResult, PayloadPart};
pub use model::{FoodItem, NormalizedResult, NutritionTotals};
pub use request::{AnalyzeInput, Mode};

use std::time::Instant;

use ai_llm_service::service_profiles::LlmServiceProfiles;
use tracing::{info, warn};

/// Runs the whole pipeline for one validated request.
///
/// Size limits and input presence are expected to be checked by the caller
/// through [`AnalyzeInput::validate`]; the credential is checked here so no
/// call is attempted for a misconfigured service.
///
/// # Errors
/// - [`AnalyzeError::Configuration`] when no API key is configured
/// - [`AnalyzeError::UpstreamTimeout`] / [`AnalyzeError::UpstreamError`] from the model call
/// - [`AnalyzeError::UnparseableResponse`] when the reply holds no JSON object
pub async fn analyze(
    llm: &LlmServiceProfiles,
    input: &AnalyzeInput,
) -> AnalyzeResult<NormalizedResult> {
    llm.ensure_credentials()?;

    let started = Instant::now();
    let plan = prompt::build_prompt(input);

    let raw = match llm.complete(plan.variant, &plan.messages).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(
                variant = plan.variant.as_str(),
                error = %e,
                latency_ms = started.elapsed().as_millis(),
                "model call failed"
            );
            return Err(e.into());
        }
    };

    let result = normalize::normalize_reply(&raw)?;

    info!(
        mode = input.mode.as_str(),
        variant = plan.variant.as_str(),
        items = result.items.len(),
        kcal = result.totals.kcal,
        latency_ms = started.elapsed().as_millis(),
        "meal analyzed"
    );

    Ok(result)
}
