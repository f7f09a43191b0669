use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{BackendError, RecognitionBackend};
use crate::{http_client::http_client, recording::RecordingBuffer};

const DEFAULT_SPEECH_API_URL: &str = "https://speech.googleapis.com/v1";

/// Google Cloud Speech-to-Text `speech:recognize` backend
pub struct GoogleSpeechBackend {
    client: Client,
    base_url: String,
    api_key: Option<SecretString>,
}

impl GoogleSpeechBackend {
    pub fn new(api_key: Option<SecretString>, base_url: Option<String>) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| DEFAULT_SPEECH_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Self {
            client: http_client(),
            base_url,
            api_key,
        }
    }
}

#[derive(Debug, Serialize)]
struct RecognizeRequest<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'static str,
    sample_rate_hertz: u32,
    audio_channel_count: u16,
    language_code: &'a str,
}

#[derive(Debug, Serialize)]
struct RecognitionAudio {
    content: String,
}

impl<'a> RecognizeRequest<'a> {
    fn new(recording: &RecordingBuffer, language: &'a str) -> Self {
        Self {
            config: RecognitionConfig {
                encoding: "LINEAR16",
                sample_rate_hertz: recording.sample_rate,
                audio_channel_count: recording.channels,
                language_code: language,
            },
            audio: RecognitionAudio {
                content: STANDARD.encode(recording.pcm_le_bytes()),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechResult>,
}

#[derive(Debug, Deserialize)]
struct SpeechResult {
    #[serde(default)]
    alternatives: Vec<SpeechAlternative>,
}

#[derive(Debug, Deserialize)]
struct SpeechAlternative {
    #[serde(default)]
    transcript: String,
}

impl RecognizeResponse {
    /// Best alternative of each consecutive result, joined
    fn transcript(&self) -> Option<String> {
        let text = self
            .results
            .iter()
            .filter_map(|r| r.alternatives.first())
            .map(|a| a.transcript.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        (!text.is_empty()).then_some(text)
    }
}

#[async_trait]
impl RecognitionBackend for GoogleSpeechBackend {
    async fn recognize(&self, recording: &RecordingBuffer, language: &str) -> Result<String, BackendError> {
        let url = format!("{}/speech:recognize", self.base_url);

        tracing::debug!(
            samples = recording.samples.len(),
            sample_rate = recording.sample_rate,
            language,
            "speech recognition request"
        );

        let mut request = self.client.post(&url).json(&RecognizeRequest::new(recording, language));

        if let Some(api_key) = &self.api_key {
            request = request.query(&[("key", api_key.expose_secret())]);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!("speech recognition request failed: {e}");
            BackendError::Transport(e.to_string())
        })?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

            tracing::error!("speech recognition API error ({status}): {error_text}");

            return Err(BackendError::Request(format!("{status}: {error_text}")));
        }

        let result: RecognizeResponse = response.json().await.map_err(|e| {
            tracing::error!("failed to parse speech recognition response: {e}");
            BackendError::Unexpected(format!("invalid response body: {e}"))
        })?;

        result.transcript().ok_or(BackendError::Unintelligible)
    }

    fn name(&self) -> &str {
        "google"
    }
}
