use axum::{Json, Router, extract::State, routing::get};
use tactus_core::{InfoResponse, ServiceInfo};

const DESCRIPTION: &str = "API for converting speech to text, text to Braille and text to sign language";

const ENDPOINTS: &[(&str, &str)] = &[
    ("GET /", "This information"),
    ("PUT /v1/api/using/engine", "Update speech-to-text engine"),
    ("PUT /v1/api/using/language", "Update speech-to-text language"),
    ("POST /v1/api/using/speech2text", "Convert speech to text (file upload)"),
    (
        "POST /v1/api/using/speech2text_batch",
        "Convert several speech files to text (multi-file upload)",
    ),
    (
        "POST /v1/api/using_base64/speech2text_base64",
        "Convert speech to text (base64 encoded audio)",
    ),
    ("POST /v1/api/using/braille", "Convert text to Braille"),
    ("POST /v1/api/using/sign", "Convert text to Sign Language"),
    ("POST /v1/api/using/file/read", "Read and convert file to Braille"),
];

pub fn info_router() -> Router<ServiceInfo> {
    Router::new().route("/", get(root_handler))
}

async fn root_handler(State(info): State<ServiceInfo>) -> Json<InfoResponse> {
    let endpoints = ENDPOINTS
        .iter()
        .map(|(route, summary)| ((*route).to_string(), serde_json::Value::from(*summary)))
        .collect::<serde_json::Map<_, _>>();

    Json(
        info.respond(format!("Welcome to {} API", info.service()))
            .with_results(serde_json::json!({
                "version": env!("CARGO_PKG_VERSION"),
                "description": DESCRIPTION,
                "endpoints": endpoints,
            })),
    )
}
