//! Error handling for the Harvest Insights Platform
//!
//! Maps pipeline and store failures onto consistent JSON error responses.

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::stores::StoreError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Input errors
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    // Store errors
    #[error("Storage error: {0}")]
    Storage(#[source] StoreError),

    #[error("Retrieval error: {0}")]
    Retrieval(#[source] StoreError),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidPayload(_) | AppError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Storage(_) | AppError::Retrieval(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_detail = match &self {
            AppError::InvalidPayload(msg) => ErrorDetail {
                code: "INVALID_PAYLOAD".to_string(),
                message: msg.clone(),
                fields: None,
            },
            AppError::Validation(errors) => ErrorDetail {
                code: "VALIDATION_ERROR".to_string(),
                message: "One or more fields are invalid".to_string(),
                fields: Some(shared::describe_validation_errors(errors)),
            },
            AppError::InvalidQuery(msg) => ErrorDetail {
                code: "INVALID_QUERY".to_string(),
                message: msg.clone(),
                fields: None,
            },
            AppError::Storage(_) => ErrorDetail {
                code: "STORAGE_ERROR".to_string(),
                message: "Failed to save to database.".to_string(),
                fields: None,
            },
            AppError::Retrieval(_) => ErrorDetail {
                code: "RETRIEVAL_ERROR".to_string(),
                message: "Failed to retrieve records from database.".to_string(),
                fields: None,
            },
        };

        // Client errors are expected traffic
        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
