#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

pub mod backend;
mod error;
mod http_client;
mod normalize;
mod recording;
mod request;
mod retry;
mod server;
mod session;
mod transcriber;
mod types;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Query, State},
    routing::{post, put},
};
use tactus_core::{InfoResponse, ServiceInfo};

pub use backend::{BackendError, RecognitionBackend};
pub use error::{Result, SttError};
pub use normalize::Normalizer;
pub use recording::RecordingBuffer;
pub use request::{ExtractUploads, UPLOAD_LIMIT_BYTES, Upload};
pub use retry::RetryPolicy;
pub use server::{Server, SttServerBuilder};
pub use session::{SessionOptions, SessionOrchestrator};
pub use transcriber::TranscriptionClient;
pub use types::{
    AudioKind, AudioSource, Base64Audio, ErrorKind, NormalizationOutcome, SessionOutcome, TranscriptionResult,
};
use types::{EngineQuery, LanguageQuery};

/// Build the speech server from configuration with the configured backend
pub fn build_server(config: &tactus_config::Config, info: ServiceInfo) -> Arc<Server> {
    Arc::new(SttServerBuilder::new(config, info).build())
}

/// Create the endpoint router for the speech API
pub fn endpoint_router() -> Router<Arc<Server>> {
    Router::new()
        .route("/v1/api/using/engine", put(set_engine))
        .route("/v1/api/using/language", put(set_language))
        .route("/v1/api/using/speech2text", post(speech_to_text))
        .route("/v1/api/using/speech2text_batch", post(speech_to_text_batch))
        .route("/v1/api/using_base64/speech2text_base64", post(speech_to_text_base64))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
}

async fn set_engine(State(server): State<Arc<Server>>, Query(query): Query<EngineQuery>) -> Result<Json<InfoResponse>> {
    server.set_engine(&query.engine).map(Json)
}

async fn set_language(
    State(server): State<Arc<Server>>,
    Query(query): Query<LanguageQuery>,
) -> Result<Json<InfoResponse>> {
    server.set_language(&query.language).map(Json)
}

/// Handle a single-file multipart upload; extra files are ignored
async fn speech_to_text(
    State(server): State<Arc<Server>>,
    ExtractUploads(uploads): ExtractUploads,
) -> Result<Json<InfoResponse>> {
    let Some(upload) = uploads.into_iter().next() else {
        return Err(SttError::InvalidRequest("no file uploaded".to_string()));
    };

    tracing::debug!(filename = %upload.filename, "speech2text handler called");

    server.speech_to_text(upload).await.map(Json)
}

async fn speech_to_text_batch(
    State(server): State<Arc<Server>>,
    ExtractUploads(uploads): ExtractUploads,
) -> Result<Json<InfoResponse>> {
    tracing::debug!(files = uploads.len(), "speech2text batch handler called");

    server.speech_to_text_batch(uploads).await.map(Json)
}

async fn speech_to_text_base64(
    State(server): State<Arc<Server>>,
    Json(request): Json<Base64Audio>,
) -> Result<Json<InfoResponse>> {
    tracing::debug!(filename = %request.filename, "speech2text base64 handler called");

    server.speech_to_text_base64(request).await.map(Json)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use hound::{SampleFormat, WavSpec, WavWriter};
    use tactus_config::{Config, SessionMode};
    use tactus_core::{EngineSettings, EngineState};
    use tower::ServiceExt;

    use super::*;

    /// Transcribes a recording as its sample count
    struct SampleCounter;

    #[async_trait]
    impl RecognitionBackend for SampleCounter {
        async fn recognize(&self, recording: &RecordingBuffer, _language: &str) -> std::result::Result<String, BackendError> {
            Ok(recording.samples.len().to_string())
        }

        fn name(&self) -> &str {
            "sample-counter"
        }
    }

    fn wav_bytes(samples: usize) -> Vec<u8> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut writer = WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..samples {
            writer.write_sample(i16::try_from(i % 128).unwrap() * 100).unwrap();
        }
        writer.finalize().unwrap();
        cursor.into_inner()
    }

    fn pooled_router(root: &Path) -> Router {
        let mut config = Config::default();
        config.paths.upload_dir = root.join("temp");
        config.paths.sound_dir = root.join("temp/sound");
        config.paths.record_dir = root.join("temp/json");
        config.sessions.mode = SessionMode::Pool;
        config.sessions.workers = 2;

        let engine = Arc::new(EngineState::new(EngineSettings::new("speech_recognition", "en")));
        let server = SttServerBuilder::new(&config, ServiceInfo::new("Speech-to-Text", engine))
            .with_backend(Arc::new(SampleCounter))
            .build();

        endpoint_router().with_state(Arc::new(server))
    }

    fn batch_request(parts: &[(&str, &str, Vec<u8>)]) -> http::Request<Body> {
        let mut body = Vec::new();
        for (filename, content_type, data) in parts {
            body.extend_from_slice(
                format!(
                    "--X\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(b"--X--\r\n");

        http::Request::builder()
            .method("POST")
            .uri("/v1/api/using/speech2text_batch")
            .header(http::header::CONTENT_TYPE, "multipart/form-data; boundary=X")
            .body(Body::from(body))
            .unwrap()
    }

    async fn batch_results(router: Router, request: http::Request<Body>) -> Vec<serde_json::Value> {
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), http::StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        json["results"].as_array().unwrap().clone()
    }

    #[tokio::test]
    async fn pooled_batch_is_served_over_http() {
        let dir = tempfile::tempdir().unwrap();

        let results = batch_results(
            pooled_router(dir.path()),
            batch_request(&[
                ("one.wav", "audio/wav", wav_bytes(400)),
                ("two.mp3", "audio/mpeg", wav_bytes(200)),
            ]),
        )
        .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["text"], "400");
        assert_eq!(results[1]["text"], "200");
        assert!(dir.path().join("temp/one.wav").exists());
        assert!(!dir.path().join("temp/two.mp3").exists());
        assert!(!dir.path().join("temp/sound/two.wav").exists());
    }

    #[tokio::test]
    async fn same_named_batch_files_stay_separate() {
        let dir = tempfile::tempdir().unwrap();

        let results = batch_results(
            pooled_router(dir.path()),
            batch_request(&[
                ("recording.wav", "audio/wav", wav_bytes(1_600)),
                ("recording.wav", "audio/wav", wav_bytes(800)),
                ("recording.mp3", "audio/mpeg", wav_bytes(400)),
            ]),
        )
        .await;

        assert_eq!(results[0]["text"], "1600");
        assert_eq!(results[1]["text"], "800");
        assert_eq!(results[2]["text"], "400");

        let temp = dir.path().join("temp");
        assert_eq!(results[0]["audio"], temp.join("recording.wav").to_str().unwrap());
        assert_eq!(results[1]["audio"], temp.join("recording-2.wav").to_str().unwrap());
        assert_eq!(
            results[2]["audio"],
            temp.join("sound/recording-3.wav").to_str().unwrap()
        );
    }
}
