//! POST /api/analyze: recognize a meal and return normalized nutrition.

use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{
        State,
        rejection::{BytesRejection, FailedToBufferBody},
    },
    http::{HeaderMap, StatusCode, header},
};
use meal_analyzer::{AnalyzeError, NormalizedResult, PayloadPart, analyze, limits};
use tracing::{Span, info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::analyze::analyze_request::AnalyzeRequest,
};

/// Handler: POST /api/analyze
///
/// Checks run before any model call: body size, credential, JSON shape
/// and image size. The body limit itself is enforced by the
/// `DefaultBodyLimit` layer installed on this route.
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:8787/api/analyze \
///   -H 'content-type: application/json' \
///   -d '{"text":"a bowl of rice and two eggs"}'
/// ```
#[instrument(
    name = "analyze_route",
    skip_all,
    fields(body_bytes = tracing::field::Empty, mode = tracing::field::Empty, has_image = tracing::field::Empty)
)]
pub async fn analyze_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> AppResult<Json<NormalizedResult>> {
    // --- Size ceiling: declared length first, then the buffered body -----------
    if let Some(declared) = content_length(&headers) {
        limits::check_body_len(declared)?;
    }
    let bytes = body.map_err(|rejection| body_error(rejection, &headers))?;
    limits::check_body_len(bytes.len())?;
    Span::current().record("body_bytes", bytes.len());

    // --- Credential ------------------------------------------------------------
    state
        .llm
        .ensure_credentials()
        .map_err(|_| AnalyzeError::Configuration)?;

    // --- Decode + validate -----------------------------------------------------
    let req: AnalyzeRequest = serde_json::from_slice(&bytes)
        .map_err(|e| AnalyzeError::InvalidRequest(format!("body is not valid JSON: {e}")))?;
    let input = req.into_input();
    input.validate()?;

    Span::current().record("mode", input.mode.as_str());
    Span::current().record("has_image", input.has_image());
    info!("analysis request accepted");

    let result = analyze(&state.llm, &input).await?;
    Ok(Json(result))
}

/// Handler: OPTIONS /api/analyze. CORS preflight; headers come from the middleware.
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

/// Any method other than POST/OPTIONS.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Only an exceeded length limit is a payload problem; anything else is a read failure.
fn body_error(rejection: BytesRejection, headers: &HeaderMap) -> AppError {
    match rejection {
        BytesRejection::FailedToBufferBody(FailedToBufferBody::LengthLimitError(_)) => {
            AnalyzeError::PayloadTooLarge {
                part: PayloadPart::Body,
                actual: content_length(headers).unwrap_or(limits::MAX_BODY_BYTES + 1),
                limit: limits::MAX_BODY_BYTES,
            }
            .into()
        }
        other => AppError::BodyRead {
            detail: other.body_text(),
        },
    }
}

fn content_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
