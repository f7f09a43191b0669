//! Mock speech-recognition backend for integration tests
//!
//! Implements the `speech:recognize` call with canned transcripts

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router, routing};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

/// Mock backend that returns predictable recognition results
pub struct MockSpeech {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<MockSpeechState>,
}

struct MockSpeechState {
    request_count: AtomicU32,
    /// Number of requests to fail before succeeding (0 = never fail)
    fail_count: AtomicU32,
    /// Transcript per language; a language with none gets an empty result
    transcripts: Vec<(String, String)>,
    languages: Mutex<Vec<String>>,
    api_keys: Mutex<Vec<Option<String>>>,
}

impl MockSpeech {
    /// Start a mock that transcribes every request as "hello"
    pub async fn start() -> anyhow::Result<Self> {
        Self::start_inner(0, vec![("th".to_owned(), "hello".to_owned()), ("en".to_owned(), "hello".to_owned())]).await
    }

    /// Start a mock that only understands `language`
    pub async fn start_understanding(language: &str, transcript: &str) -> anyhow::Result<Self> {
        Self::start_inner(0, vec![(language.to_owned(), transcript.to_owned())]).await
    }

    /// Start a mock that fails the first `n` requests with 503
    pub async fn start_failing(n: u32) -> anyhow::Result<Self> {
        Self::start_inner(n, vec![("th".to_owned(), "hello".to_owned())]).await
    }

    /// Start a mock that never finds speech
    pub async fn start_unintelligible() -> anyhow::Result<Self> {
        Self::start_inner(0, Vec::new()).await
    }

    async fn start_inner(fail_count: u32, transcripts: Vec<(String, String)>) -> anyhow::Result<Self> {
        let state = Arc::new(MockSpeechState {
            request_count: AtomicU32::new(0),
            fail_count: AtomicU32::new(fail_count),
            transcripts,
            languages: Mutex::new(Vec::new()),
            api_keys: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/v1/speech:recognize", routing::post(handle_recognize))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Base URL for configuring the mock as the backend
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Number of recognition requests received
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }

    /// Language codes seen, in arrival order
    pub fn languages(&self) -> Vec<String> {
        self.state.languages.lock().unwrap().clone()
    }

    /// API keys seen, in arrival order
    pub fn api_keys(&self) -> Vec<Option<String>> {
        self.state.api_keys.lock().unwrap().clone()
    }
}

impl Drop for MockSpeech {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

// -- Wire types matching the recognize call --

#[derive(Debug, Deserialize)]
struct RecognizeRequest {
    config: RecognitionConfig,
    audio: RecognitionAudio,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig {
    encoding: String,
    language_code: String,
    sample_rate_hertz: u32,
}

#[derive(Debug, Deserialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Debug, Deserialize)]
struct KeyQuery {
    key: Option<String>,
}

async fn handle_recognize(
    State(state): State<Arc<MockSpeechState>>,
    Query(query): Query<KeyQuery>,
    Json(request): Json<RecognizeRequest>,
) -> Response {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    state.languages.lock().unwrap().push(request.config.language_code.clone());
    state.api_keys.lock().unwrap().push(query.key);

    let remaining = state.fail_count.load(Ordering::Relaxed);
    if remaining > 0 {
        state.fail_count.fetch_sub(1, Ordering::Relaxed);
        return (StatusCode::SERVICE_UNAVAILABLE, "backend overloaded").into_response();
    }

    if request.config.encoding != "LINEAR16" || request.config.sample_rate_hertz == 0 || request.audio.content.is_empty() {
        return (StatusCode::BAD_REQUEST, "malformed recognition request").into_response();
    }

    let transcript = state
        .transcripts
        .iter()
        .find(|(language, _)| *language == request.config.language_code)
        .map(|(_, transcript)| transcript.clone());

    match transcript {
        Some(transcript) => Json(serde_json::json!({
            "results": [{"alternatives": [{"transcript": transcript, "confidence": 0.93}]}]
        }))
        .into_response(),
        None => Json(serde_json::json!({})).into_response(),
    }
}
