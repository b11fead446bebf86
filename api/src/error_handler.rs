use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ai_llm_service::error_handler::make_snippet;
use meal_analyzer::AnalyzeError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// Public application error type.
///
/// Every variant renders as `{ "error": "<message>" }`.
#[derive(Debug, Error)]
pub enum AppError {
    // --- IO / network / server ---
    #[error("failed to bind listener on {address}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    /// Client disconnect or a broken body stream; `detail` is logged only.
    #[error("Failed to read the request body")]
    BodyRead { detail: String },

    // --- Request / routing ---
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error(transparent)]
    Analyze(#[from] AnalyzeError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Analyze(_)
            | AppError::BodyRead { .. }
            | AppError::Bind { .. }
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Logs diagnostics that must not reach the caller (e.g. upstream bodies).
    fn log(&self, status: StatusCode) {
        match self {
            AppError::Analyze(AnalyzeError::UpstreamError { status: up, body }) => error!(
                upstream_status = ?up,
                body = %make_snippet(body),
                "model service returned an error"
            ),
            AppError::Analyze(AnalyzeError::UnparseableResponse { raw }) => error!(
                reply = %make_snippet(raw),
                "model reply could not be parsed"
            ),
            AppError::BodyRead { detail } => warn!(%detail, "request body could not be read"),
            _ if status.is_server_error() => error!(%status, error = %self, "request failed"),
            _ => warn!(%status, error = %self, "request rejected"),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        self.log(status);
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
