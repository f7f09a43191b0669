use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tactus_core::HttpError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SttError>;

/// Speech service errors with appropriate HTTP status codes
///
/// Per-session outcomes (unintelligible audio, backend failures) are not
/// errors at this level; they travel inside [`crate::TranscriptionResult`].
#[derive(Debug, Error)]
pub enum SttError {
    /// Invalid request parameters or payload
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The input could not be turned into canonical PCM WAV
    #[error("Transcoding failed: {0}")]
    Transcode(String),

    /// Upload or working-directory I/O failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal server error
    /// If Some(message), the detail is safe to show
    /// If None, it's an internal error and should not leak details
    #[error("Internal server error")]
    InternalError(Option<String>),
}

impl HttpError for SttError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Transcode(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) | Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &str {
        match self {
            Self::InvalidRequest(_) => "invalid_request_error",
            Self::Transcode(_) => "transcode_error",
            Self::Storage(_) | Self::InternalError(_) => "internal_error",
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

impl IntoResponse for SttError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.error_body())).into_response()
    }
}
