use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::llm::LlmError;
use crate::store::StoreError;
use crate::utils::response::error as error_response;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Llm(LlmError::Unavailable) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Llm(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Store(_) => "STORAGE_ERROR",
            AppError::Llm(LlmError::Unavailable) => "SERVICE_UNAVAILABLE",
            AppError::Llm(_) => "EXTERNAL_SERVICE_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => {
                tracing::debug!(error = ?self, message = %msg, "Request rejected");
            }
            AppError::Store(e) => {
                error!(error = ?e, "Event store error");
            }
            AppError::Llm(e) => {
                error!(error = ?e, "Chat request failed");
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        // Log internal details
        self.log();

        // Only expose high-level message to the client
        let public_message = match &self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Store(_) => "Failed to fetch events".to_string(),
            AppError::Llm(LlmError::Unavailable) => {
                "Chat service is unavailable due to server configuration error.".to_string()
            }
            AppError::Llm(_) => "Failed to process chat request".to_string(),
        };

        error_response(code, public_message, status)
    }
}
