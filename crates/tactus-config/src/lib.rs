#![allow(clippy::must_use_candidate)]

pub mod backend;
pub mod engine;
mod env;
mod loader;
pub mod paths;
pub mod retry;
pub mod server;
pub mod sessions;
pub mod telemetry;

use serde::Deserialize;

pub use backend::*;
pub use engine::*;
pub use paths::*;
pub use retry::*;
pub use server::*;
pub use sessions::*;
pub use telemetry::{LogFormat, TelemetryConfig};

/// Top-level Tactus configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Service name reported in every response envelope
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Default engine and language
    #[serde(default)]
    pub engine: EngineConfig,
    /// Working directories
    #[serde(default)]
    pub paths: PathsConfig,
    /// Remote recognition backend
    #[serde(default)]
    pub backend: BackendConfig,
    /// Retry policy for backend calls
    #[serde(default)]
    pub retry: RetryConfig,
    /// Session execution options
    #[serde(default)]
    pub sessions: SessionsConfig,
    /// Logging configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            server: ServerConfig::default(),
            engine: EngineConfig::default(),
            paths: PathsConfig::default(),
            backend: BackendConfig::default(),
            retry: RetryConfig::default(),
            sessions: SessionsConfig::default(),
            telemetry: None,
        }
    }
}

fn default_service_name() -> String {
    "Speech-to-Text".to_string()
}
