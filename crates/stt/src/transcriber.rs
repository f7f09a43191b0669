use std::{path::Path, sync::Arc};

use tactus_core::Engine;

use crate::{
    backend::{BackendError, RecognitionBackend},
    recording::RecordingBuffer,
    retry::RetryPolicy,
    types::{ErrorKind, TranscriptionResult},
};

/// Sends canonical WAV files to the recognition backend under a retry policy
#[derive(Clone)]
pub struct TranscriptionClient {
    backend: Arc<dyn RecognitionBackend>,
    retry: RetryPolicy,
}

impl TranscriptionClient {
    pub fn new(backend: Arc<dyn RecognitionBackend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    /// Transcribe the WAV at `audio`
    ///
    /// Never fails at the call level; every problem is reported as
    /// [`TranscriptionResult::Failed`]. An unsupported engine is reported
    /// without contacting the backend.
    pub async fn transcribe(&self, audio: &Path, language: &str, engine: &str) -> TranscriptionResult {
        let engine = match engine.parse::<Engine>() {
            Ok(engine) => engine,
            Err(e) => {
                tracing::warn!(engine, "transcription requested with unsupported engine");
                return TranscriptionResult::failed(ErrorKind::UnsupportedEngine, e.to_string());
            }
        };

        let recording = match read_recording(audio).await {
            Ok(recording) => recording,
            Err(message) => return TranscriptionResult::failed(ErrorKind::Unexpected, message),
        };

        tracing::debug!(
            %engine,
            backend = self.backend.name(),
            language,
            duration_ms = u64::try_from(recording.duration().as_millis()).unwrap_or(u64::MAX),
            "transcribing"
        );

        let outcome = self
            .retry
            .run(
                || self.backend.recognize(&recording, language),
                BackendError::is_transient,
            )
            .await;

        match outcome {
            Ok(text) => {
                tracing::info!(audio = %audio.display(), "transcription succeeded");
                TranscriptionResult::Transcribed {
                    text,
                    audio: audio.to_path_buf(),
                }
            }
            Err(e) => {
                tracing::warn!(audio = %audio.display(), error = %e, "transcription failed");
                TranscriptionResult::failed(e.kind(), e.to_string())
            }
        }
    }
}

async fn read_recording(audio: &Path) -> Result<RecordingBuffer, String> {
    let path = audio.to_path_buf();

    tokio::task::spawn_blocking(move || RecordingBuffer::from_wav(&path))
        .await
        .map_err(|e| format!("Unexpected error: audio reader task failed: {e}"))?
        .map_err(|e| format!("Unexpected error: cannot read {}: {e}", audio.display()))
}
