#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

mod braille;
mod document;
mod error;
mod sign;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    routing::post,
};
use serde::Deserialize;
use tactus_core::{InfoResponse, ServiceInfo};

pub use braille::{BRAILLE_LANGUAGE, BrailleOutcome, text_to_braille};
pub use document::{Extracted, SUPPORTED_FORMATS, extract, file_type};
pub use error::{ConvertError, Result};
pub use sign::{SignLibrary, SignOutcome, SignReference};

/// Body limit for document uploads (32 MiB)
const DOCUMENT_LIMIT_BYTES: usize = 32 << 20;

/// Shared state for the text conversion endpoints
pub struct Converter {
    info: ServiceInfo,
    signs: SignLibrary,
}

impl Converter {
    pub fn new(info: ServiceInfo, signs: SignLibrary) -> Self {
        Self { info, signs }
    }
}

/// Build the converter from configuration, loading the sign library once
pub fn build_converter(config: &tactus_config::Config, info: ServiceInfo) -> Arc<Converter> {
    let signs = SignLibrary::load(&config.paths.sign_dir);

    if signs.is_empty() {
        tracing::warn!(
            dir = %config.paths.sign_dir.display(),
            "no sign images found, sign translations will carry no images"
        );
    }

    Arc::new(Converter::new(info, signs))
}

/// Create the endpoint router for Braille, sign and document conversion
pub fn endpoint_router() -> Router<Arc<Converter>> {
    Router::new()
        .route("/v1/api/using/braille", post(braille_handler))
        .route("/v1/api/using/sign", post(sign_handler))
        .route("/v1/api/using/file/read", post(read_file_handler))
        .layer(DefaultBodyLimit::max(DOCUMENT_LIMIT_BYTES))
}

#[derive(Debug, Deserialize)]
struct TextRequest {
    text: String,
}

async fn braille_handler(
    State(converter): State<Arc<Converter>>,
    Json(request): Json<TextRequest>,
) -> Json<InfoResponse> {
    let braille_text = text_to_braille(&request.text);

    let results = serde_json::json!({
        "original_text": request.text,
        "braille_text": braille_text,
    });

    Json(
        converter
            .info
            .respond("Text to Braille conversion completed successfully.")
            .with_results(results),
    )
}

async fn sign_handler(
    State(converter): State<Arc<Converter>>,
    Json(request): Json<TextRequest>,
) -> Json<InfoResponse> {
    let sign_result = converter.signs.translate(&request.text);

    let results = serde_json::json!({
        "original_text": request.text,
        "sign_result": sign_result,
    });

    Json(
        converter
            .info
            .respond("Text to Sign Language conversion completed successfully.")
            .with_results(results),
    )
}

async fn read_file_handler(
    State(converter): State<Arc<Converter>>,
    mut multipart: Multipart,
) -> Result<Json<InfoResponse>> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ConvertError::InvalidRequest(format!("failed to read multipart form: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ConvertError::InvalidRequest(format!("failed to read file data: {e}")))?;

        upload = Some((filename, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| ConvertError::InvalidRequest("missing required 'file' field".to_string()))?;

    tracing::debug!(%filename, bytes = data.len(), "file read handler called");

    let extracted = extract(&data, &filename).await?;
    let braille_text = text_to_braille(&extracted.text);

    let results = serde_json::json!({
        "file_type": extracted.file_type,
        "original_text": extracted.text,
        "braille_text": braille_text,
    });

    Ok(Json(
        converter
            .info
            .respond("File read and converted to braille successfully")
            .with_results(results),
    ))
}

#[cfg(test)]
mod tests {
    use tactus_core::{EngineSettings, EngineState};

    use super::*;

    fn converter() -> Arc<Converter> {
        let engine = Arc::new(EngineState::new(EngineSettings::new("speech_recognition", "th")));
        Arc::new(Converter::new(
            ServiceInfo::new("Speech-to-Text", engine),
            SignLibrary::default(),
        ))
    }

    #[tokio::test]
    async fn braille_results_nest_the_conversion() {
        let Json(response) = braille_handler(
            State(converter()),
            Json(TextRequest {
                text: "Hi".to_string(),
            }),
        )
        .await;

        assert_eq!(response.message, "Text to Braille conversion completed successfully.");
        assert_eq!(response.language, "th");
        assert_eq!(
            response.results,
            Some(serde_json::json!({
                "original_text": "Hi",
                "braille_text": {"original_text": "hi", "braille_text": "⠓⠊", "language": "en"}
            }))
        );
    }

    #[tokio::test]
    async fn empty_sign_request_reports_missing_text() {
        let Json(response) = sign_handler(
            State(converter()),
            Json(TextRequest { text: String::new() }),
        )
        .await;

        assert_eq!(
            response.results,
            Some(serde_json::json!({
                "original_text": "",
                "sign_result": {"status": "error", "message": "No text provided"}
            }))
        );
    }
}
