use actix_web::{error, http::StatusCode, HttpResponse};
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::ErrorResponse;

/// Errors produced by scoring, ranking and the offer lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Offer {0} has already been decided")]
    AlreadyDecided(String),

    #[error("Offer {0} has expired")]
    Expired(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AllocationError {
    /// Short machine-readable code used in JSON error bodies
    pub fn code(&self) -> &'static str {
        match self {
            AllocationError::InvalidInput(_) => "invalid_input",
            AllocationError::InvalidState(_) => "invalid_state",
            AllocationError::AlreadyDecided(_) => "already_decided",
            AllocationError::Expired(_) => "expired",
            AllocationError::NotFound(_) => "not_found",
            AllocationError::Unauthorized(_) => "unauthorized",
            AllocationError::Forbidden(_) => "forbidden",
            AllocationError::Internal(_) => "internal",
        }
    }
}

impl From<ValidationErrors> for AllocationError {
    fn from(errors: ValidationErrors) -> Self {
        AllocationError::InvalidInput(errors.to_string())
    }
}

impl error::ResponseError for AllocationError {
    fn status_code(&self) -> StatusCode {
        match self {
            AllocationError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AllocationError::InvalidState(_) => StatusCode::CONFLICT,
            AllocationError::AlreadyDecided(_) => StatusCode::CONFLICT,
            AllocationError::Expired(_) => StatusCode::GONE,
            AllocationError::NotFound(_) => StatusCode::NOT_FOUND,
            AllocationError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AllocationError::Forbidden(_) => StatusCode::FORBIDDEN,
            AllocationError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::info!("Request rejected: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.code().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AllocationError>;
