use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tactus_core::HttpError;
use thiserror::Error;

use crate::document::SUPPORTED_FORMATS;

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Text conversion errors with appropriate HTTP status codes
#[derive(Debug, Error)]
pub enum ConvertError {
    /// Invalid request parameters or payload
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The uploaded file has an extension the extractor does not read
    #[error("Unsupported file type '{0}'. Supported formats: {formats}", formats = supported_formats())]
    UnsupportedFormat(String),

    /// The document was recognized but its text could not be read
    #[error("Error reading file: {0}")]
    Extraction(String),

    /// Internal server error
    /// If Some(message), the detail is safe to show
    /// If None, it's an internal error and should not leak details
    #[error("Internal server error")]
    InternalError(Option<String>),
}

fn supported_formats() -> String {
    SUPPORTED_FORMATS
        .iter()
        .map(|ext| format!(".{ext}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl HttpError for ConvertError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::Extraction(_) => "extraction_error",
            Self::InternalError(_) => "internal_error",
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::InternalError(Some(message)) => message.clone(),
            Self::InternalError(None) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ConvertError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.error_body())).into_response()
    }
}
