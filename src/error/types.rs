use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

use crate::services::inference::InferenceError;
use crate::services::pdf_processor::ExtractionError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("No file uploaded")]
    MissingFile,

    #[error("Invalid upload: {message}")]
    InvalidUpload { message: String },

    #[error("File too large: exceeds limit of {limit}MB")]
    FileTooLarge { limit: usize },

    #[error("Failed to store upload: {message}")]
    Storage { message: String },

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error("Model returned invalid JSON: {message}")]
    InvalidCompletion { message: String },

    #[error("Model response does not match the analysis schema: {message}")]
    SchemaMismatch { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingFile => "MISSING_FILE",
            AppError::InvalidUpload { .. } => "INVALID_UPLOAD",
            AppError::FileTooLarge { .. } => "FILE_TOO_LARGE",
            AppError::Storage { .. } => "STORAGE_ERROR",
            AppError::Extraction(_) => "EXTRACTION_ERROR",
            AppError::Inference(_) => "INFERENCE_ERROR",
            AppError::InvalidCompletion { .. } => "INVALID_COMPLETION",
            AppError::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingFile => StatusCode::BAD_REQUEST,
            AppError::InvalidUpload { .. } => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Storage { .. }
            | AppError::Extraction(_)
            | AppError::Inference(_)
            | AppError::InvalidCompletion { .. }
            | AppError::SchemaMismatch { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The caller-facing error category. Every failure after the upload has
    /// been accepted collapses to "Processing failed".
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::MissingFile => "No file uploaded",
            AppError::InvalidUpload { .. } => "Invalid upload",
            AppError::FileTooLarge { .. } => "File too large",
            _ => "Processing failed",
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();
        let message = self.to_string();

        if self.is_client_error() {
            tracing::warn!(
                error_code = error_code,
                status_code = %status,
                error_message = %message,
                "Request rejected"
            );
        } else {
            tracing::error!(
                error_code = error_code,
                status_code = %status,
                error_message = %message,
                "API error occurred"
            );
        }

        let body = ErrorResponse {
            error: self.public_message().to_string(),
            details: (!matches!(self, AppError::MissingFile)).then_some(message),
        };

        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidCompletion {
            message: err.to_string(),
        }
    }
}

impl AppError {
    pub fn invalid_upload(message: impl Into<String>) -> Self {
        AppError::InvalidUpload {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        AppError::Storage {
            message: message.into(),
        }
    }

    pub fn schema(message: impl Into<String>) -> Self {
        AppError::SchemaMismatch {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal {
            message: message.into(),
        }
    }
}
