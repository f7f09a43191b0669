use serde::Deserialize;
use tactus_core::{Engine, EngineSettings};

/// Engine and language selected at startup
///
/// Both can be changed at runtime through the admin endpoints; these values
/// only seed the shared engine state.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default = "default_engine")]
    pub engine: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine: default_engine(),
            language: default_language(),
        }
    }
}

impl EngineConfig {
    pub fn settings(&self) -> EngineSettings {
        EngineSettings::new(self.engine.clone(), self.language.clone())
    }
}

fn default_engine() -> String {
    Engine::SpeechRecognition.as_str().to_string()
}

fn default_language() -> String {
    "th".to_string()
}
