use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::domain::order::OrderError;
use crate::repository::PersistenceError;

// ============================================================================
// API Errors - one variant per client-visible failure class
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("malformed request body: {0}")]
    MalformedInput(String),

    #[error("invalid order: {0}")]
    InvalidOrder(#[from] OrderError),

    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("order {0} not found")]
    NotFound(i64),

    #[error("persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}

impl ApiError {
    pub fn malformed(error: impl std::fmt::Display) -> Self {
        ApiError::MalformedInput(error.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedInput(_) | ApiError::InvalidOrder(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Storage failures are logged here and never echoed to the client
        let message = match self {
            ApiError::Persistence(e) => {
                tracing::error!(error = %e, "Repository call failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({ "error": message }))
    }
}
