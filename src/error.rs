use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::MissingSlots;
use crate::services::sampler::SamplerError;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing or invalid owner identity")]
    Unauthorized,

    #[error("Not enough items to build an outfit, missing: {0}")]
    InsufficientWardrobe(MissingSlots),

    #[error("No outfit to act on yet")]
    NoCurrentOutfit,

    #[error(transparent)]
    Sampling(#[from] SamplerError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code so clients can tell failures apart
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) | AppError::Storage(_) => "storage_unavailable",
            AppError::NotFound(_) => "not_found",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Unauthorized => "unauthorized",
            AppError::InsufficientWardrobe(_) => "insufficient_wardrobe",
            AppError::NoCurrentOutfit => "no_current_outfit",
            AppError::Sampling(_) | AppError::Internal(_) => "internal",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::InsufficientWardrobe(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NoCurrentOutfit => StatusCode::CONFLICT,
            AppError::Sampling(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            AppError::InsufficientWardrobe(missing) => json!({
                "error": self.to_string(),
                "code": self.code(),
                "missing": missing,
            }),
            AppError::Sampling(e) => {
                // Reaching the sampler with no candidates is a bug, not a user error
                tracing::error!(error = %e, "Sampler invariant violated");
                json!({ "error": "Internal server error", "code": self.code() })
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "Database failure");
                json!({ "error": "Storage temporarily unavailable, try again", "code": self.code() })
            }
            _ => json!({ "error": self.to_string(), "code": self.code() }),
        };

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
