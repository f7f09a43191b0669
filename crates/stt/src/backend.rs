pub mod google;

use async_trait::async_trait;
use thiserror::Error;

use crate::{recording::RecordingBuffer, types::ErrorKind};

/// A remote speech-recognition service
#[async_trait]
pub trait RecognitionBackend: Send + Sync {
    /// Turn a whole recording into text in the given language
    async fn recognize(&self, recording: &RecordingBuffer, language: &str) -> Result<String, BackendError>;

    /// Backend name, for logs
    fn name(&self) -> &str;
}

/// Ways a recognition call can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The service processed the audio but found no speech it could transcribe
    #[error("Audio not understood")]
    Unintelligible,

    /// The service rejected or failed the request (auth, quota, 5xx)
    #[error("Request failed: {0}")]
    Request(String),

    /// The request never completed at the network level
    #[error("Connection failed: {0}")]
    Transport(String),

    /// Anything else, such as an unparseable response
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl BackendError {
    /// Whether another attempt could plausibly succeed
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Transport(_))
    }

    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unintelligible => ErrorKind::Unintelligible,
            Self::Request(_) | Self::Transport(_) => ErrorKind::ServiceRequestFailed,
            Self::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_request_and_transport_faults_are_transient() {
        assert!(BackendError::Request("quota".into()).is_transient());
        assert!(BackendError::Transport("reset".into()).is_transient());
        assert!(!BackendError::Unintelligible.is_transient());
        assert!(!BackendError::Unexpected("bad json".into()).is_transient());
    }

    #[test]
    fn kinds_collapse_transport_into_service_failure() {
        assert_eq!(BackendError::Transport("x".into()).kind(), ErrorKind::ServiceRequestFailed);
        assert_eq!(BackendError::Request("x".into()).kind(), ErrorKind::ServiceRequestFailed);
        assert_eq!(BackendError::Unintelligible.kind(), ErrorKind::Unintelligible);
        assert_eq!(BackendError::Unexpected("x".into()).kind(), ErrorKind::Unexpected);
    }
}
