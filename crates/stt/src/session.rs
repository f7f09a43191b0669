use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use futures::{StreamExt, stream};
use tactus_config::{Config, SessionMode};
use tactus_core::EngineState;

use crate::{
    normalize::Normalizer,
    transcriber::TranscriptionClient,
    types::{AudioSource, ErrorKind, SessionOutcome, TranscriptionResult},
};

/// Where a session writes and how batches are run
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub sound_dir: PathBuf,
    pub record_dir: PathBuf,
    pub persist_records: bool,
    pub mode: SessionMode,
    pub workers: usize,
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sound_dir: config.paths.sound_dir.clone(),
            record_dir: config.paths.record_dir.clone(),
            persist_records: config.sessions.persist_records,
            mode: config.sessions.mode,
            workers: config.sessions.workers,
        }
    }
}

/// Runs normalize-then-transcribe for one input at a time
///
/// Nothing is deleted here. The caller gets the normalized path back and
/// decides what to clean up.
#[derive(Clone)]
pub struct SessionOrchestrator {
    normalizer: Normalizer,
    client: TranscriptionClient,
    engine: Arc<EngineState>,
    options: SessionOptions,
}

impl SessionOrchestrator {
    pub fn new(client: TranscriptionClient, engine: Arc<EngineState>, options: SessionOptions) -> Self {
        Self {
            normalizer: Normalizer::new(&options.sound_dir),
            client,
            engine,
            options,
        }
    }

    /// Normalize and transcribe `input`
    ///
    /// Every failure is folded into the returned [`SessionOutcome`].
    pub async fn run_session(&self, input: &Path) -> SessionOutcome {
        let source = AudioSource::new(input);
        let session_name = source.session_name();
        let settings = self.engine.snapshot();

        tracing::info!(
            session = %session_name,
            input = %input.display(),
            engine = %settings.engine,
            language = %settings.language,
            "session started"
        );

        if let Err(e) = self.prepare_dirs().await {
            return self.finish(&session_name, processing_failed(e), None).await;
        }

        let normalizer = self.normalizer.clone();
        let name = session_name.clone();
        let normalized = tokio::task::spawn_blocking(move || normalizer.normalize(&source, &name)).await;

        let outcome = match normalized {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                let result = TranscriptionResult::failed(ErrorKind::TranscodeError, e.to_string());
                return self.finish(&session_name, result, None).await;
            }
            Err(e) => return self.finish(&session_name, processing_failed(e), None).await,
        };

        let result = self
            .client
            .transcribe(&outcome.normalized_path, &settings.language, &settings.engine)
            .await;

        self.finish(&session_name, result, Some(outcome.normalized_path)).await
    }

    /// Run one session per input, results in input order
    ///
    /// Sessions run one after another unless the pool mode is configured, in
    /// which case up to `workers` are in flight at once. `workers` must be
    /// non-zero in pool mode; config validation rejects zero.
    pub async fn run_batch(&self, inputs: &[PathBuf]) -> Vec<SessionOutcome> {
        match self.options.mode {
            SessionMode::Sequential => {
                let mut outcomes = Vec::with_capacity(inputs.len());
                for input in inputs {
                    outcomes.push(self.run_session(input).await);
                }
                outcomes
            }
            SessionMode::Pool => {
                tracing::debug!(inputs = inputs.len(), workers = self.options.workers, "running pooled batch");

                stream::iter(inputs.iter().cloned())
                    .map(|input| async move { self.run_session(&input).await })
                    .buffered(self.options.workers)
                    .collect()
                    .await
            }
        }
    }

    async fn prepare_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.options.sound_dir).await?;
        tokio::fs::create_dir_all(&self.options.record_dir).await
    }

    async fn finish(
        &self,
        session_name: &str,
        result: TranscriptionResult,
        normalized_path: Option<PathBuf>,
    ) -> SessionOutcome {
        match &result {
            TranscriptionResult::Transcribed { .. } => tracing::info!(session = %session_name, "session completed"),
            TranscriptionResult::Failed { kind, message } => {
                tracing::warn!(session = %session_name, ?kind, error = %message, "session failed");
            }
        }

        let record_path = if self.options.persist_records {
            self.persist(session_name, &result).await
        } else {
            None
        };

        SessionOutcome {
            result,
            record_path,
            normalized_path,
        }
    }

    async fn persist(&self, session_name: &str, result: &TranscriptionResult) -> Option<PathBuf> {
        let path = self.options.record_dir.join(format!("{session_name}.json"));

        let json = match serde_json::to_string_pretty(result) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!(session = %session_name, error = %e, "failed to serialize session record");
                return None;
            }
        };

        match tokio::fs::write(&path, json).await {
            Ok(()) => {
                tracing::debug!(record = %path.display(), "session record written");
                Some(path)
            }
            Err(e) => {
                tracing::error!(record = %path.display(), error = %e, "failed to write session record");
                None
            }
        }
    }
}

fn processing_failed(error: impl std::fmt::Display) -> TranscriptionResult {
    TranscriptionResult::failed(ErrorKind::Unexpected, format!("Processing failed: {error}"))
}
