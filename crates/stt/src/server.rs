use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tactus_config::Config;
use tactus_core::{InfoResponse, ServiceInfo};

use crate::{
    backend::{RecognitionBackend, google::GoogleSpeechBackend},
    error::{Result, SttError},
    request::{Upload, sanitize_filename},
    retry::RetryPolicy,
    session::{SessionOptions, SessionOrchestrator},
    transcriber::TranscriptionClient,
    types::{Base64Audio, CANONICAL_EXTENSION, SessionOutcome, TranscriptionResult},
};

/// Content type that marks a multipart upload as worth keeping
const CANONICAL_CONTENT_TYPE: &str = "audio/wav";

/// Speech endpoints: upload handling around the session orchestrator
pub struct Server {
    orchestrator: SessionOrchestrator,
    info: ServiceInfo,
    upload_dir: PathBuf,
}

/// An upload written to disk, and whether it outlives the request
struct StoredUpload {
    path: PathBuf,
    keep: bool,
}

impl Server {
    pub(crate) fn set_engine(&self, engine: &str) -> Result<InfoResponse> {
        let engine = engine.trim();
        if engine.is_empty() {
            return Err(SttError::InvalidRequest("engine must not be empty".to_string()));
        }

        self.info.engine().set_engine(engine);
        tracing::info!(engine, "speech-to-text engine updated");

        Ok(self
            .info
            .respond(format!("Speech-to-text engine successfully updated to '{engine}'")))
    }

    pub(crate) fn set_language(&self, language: &str) -> Result<InfoResponse> {
        let language = language.trim();
        if language.is_empty() {
            return Err(SttError::InvalidRequest("language must not be empty".to_string()));
        }

        self.info.engine().set_language(language);
        tracing::info!(language, "speech-to-text language updated");

        Ok(self
            .info
            .respond(format!("Speech-to-text language successfully set to '{language}'")))
    }

    /// Transcribe the first uploaded file
    pub(crate) async fn speech_to_text(&self, upload: Upload) -> Result<InfoResponse> {
        let keep = upload.content_type.as_deref() == Some(CANONICAL_CONTENT_TYPE);
        let stored = self.store(&upload.filename, &upload.data, keep).await?;

        let outcome = self.orchestrator.run_session(&stored.path).await;
        let result = self.cleanup(&stored, outcome).await;

        Ok(self
            .info
            .respond("Speech-to-text conversion completed successfully.")
            .with_results(results_value(&result)?))
    }

    pub(crate) async fn speech_to_text_base64(&self, request: Base64Audio) -> Result<InfoResponse> {
        let data = STANDARD
            .decode(request.content.trim())
            .map_err(|e| SttError::InvalidRequest(format!("content is not valid base64: {e}")))?;

        let filename = sanitize_filename(&request.filename);
        let keep = Path::new(&filename)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CANONICAL_EXTENSION));

        let stored = self.store(&filename, &data, keep).await?;

        let outcome = self.orchestrator.run_session(&stored.path).await;
        let result = self.cleanup(&stored, outcome).await;

        Ok(self
            .info
            .respond("Speech-to-text conversion base64 completed successfully.")
            .with_results(results_value(&result)?))
    }

    /// Transcribe every uploaded file through one batch run
    pub(crate) async fn speech_to_text_batch(&self, uploads: Vec<Upload>) -> Result<InfoResponse> {
        let filenames = distinct_filenames(uploads.iter().map(|upload| upload.filename.as_str()));

        let mut stored = Vec::with_capacity(uploads.len());
        for (upload, filename) in uploads.iter().zip(&filenames) {
            let keep = upload.content_type.as_deref() == Some(CANONICAL_CONTENT_TYPE);
            stored.push(self.store(filename, &upload.data, keep).await?);
        }

        let inputs = stored.iter().map(|s| s.path.clone()).collect::<Vec<_>>();
        let outcomes = self.orchestrator.run_batch(&inputs).await;

        let mut results = Vec::with_capacity(outcomes.len());
        for (upload, outcome) in stored.iter().zip(outcomes) {
            results.push(self.cleanup(upload, outcome).await);
        }

        Ok(self
            .info
            .respond(format!(
                "Speech-to-text conversion completed successfully for {} file(s).",
                results.len()
            ))
            .with_results(results_value(&results)?))
    }

    async fn store(&self, filename: &str, data: &[u8], keep: bool) -> Result<StoredUpload> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| SttError::Storage(format!("cannot create {}: {e}", self.upload_dir.display())))?;

        let path = self.upload_dir.join(filename);

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| SttError::Storage(format!("cannot write {}: {e}", path.display())))?;

        tracing::debug!(upload = %path.display(), bytes = data.len(), keep, "upload stored");

        Ok(StoredUpload { path, keep })
    }

    /// Drop the request's temporary files and hand back the result
    async fn cleanup(&self, upload: &StoredUpload, outcome: SessionOutcome) -> TranscriptionResult {
        if let Some(normalized) = outcome.normalized_path.as_ref().filter(|p| **p != upload.path) {
            remove_quietly(normalized).await;
        }

        if !upload.keep {
            remove_quietly(&upload.path).await;
        }

        outcome.result
    }
}

/// Rename repeated stems within one batch so each session owns its upload
/// and its normalized file; `clip.wav, clip.mp3` becomes `clip.wav, clip-2.mp3`
fn distinct_filenames<'a>(filenames: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut taken = HashSet::new();

    filenames
        .into_iter()
        .map(|filename| {
            let path = Path::new(filename);
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(filename);
            let extension = path.extension().and_then(|e| e.to_str());

            let mut candidate = stem.to_string();
            let mut suffix = 1;
            while !taken.insert(candidate.clone()) {
                suffix += 1;
                candidate = format!("{stem}-{suffix}");
            }

            match extension {
                Some(extension) => format!("{candidate}.{extension}"),
                None => candidate,
            }
        })
        .collect()
}

async fn remove_quietly(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove temporary file");
    }
}

fn results_value<T: serde::Serialize>(results: &T) -> Result<serde_json::Value> {
    serde_json::to_value(results).map_err(|e| {
        tracing::error!("failed to serialize transcription results: {e}");
        SttError::InternalError(None)
    })
}

/// Builder for constructing the speech server from configuration
pub struct SttServerBuilder<'a> {
    config: &'a Config,
    info: ServiceInfo,
    backend: Option<Arc<dyn RecognitionBackend>>,
}

impl<'a> SttServerBuilder<'a> {
    pub fn new(config: &'a Config, info: ServiceInfo) -> Self {
        Self {
            config,
            info,
            backend: None,
        }
    }

    /// Use `backend` instead of the configured remote service
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn RecognitionBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn build(self) -> Server {
        let backend: Arc<dyn RecognitionBackend> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(GoogleSpeechBackend::new(
                self.config.backend.api_key(),
                self.config.backend.base_url.clone(),
            )),
        };

        if backend.name() == "google" && self.config.backend.api_key().is_none() {
            tracing::warn!("no speech backend API key configured, requests will be sent without one");
        }

        let retry = RetryPolicy::from_config(&self.config.retry);
        let options = SessionOptions::from_config(self.config);

        tracing::debug!(
            backend = backend.name(),
            max_retries = retry.max_retries(),
            mode = ?options.mode,
            "speech server initialized"
        );

        let client = TranscriptionClient::new(backend, retry);
        let orchestrator = SessionOrchestrator::new(client, Arc::clone(self.info.engine()), options);

        Server {
            orchestrator,
            info: self.info,
            upload_dir: self.config.paths.upload_dir.clone(),
        }
    }
}
