use std::{
    fmt,
    str::FromStr,
    sync::{PoisonError, RwLock},
};

/// Transcription engines the service knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Remote speech-recognition web service
    SpeechRecognition,
}

impl Engine {
    /// Every supported engine, in declaration order
    pub const ALL: &[Self] = &[Self::SpeechRecognition];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SpeechRecognition => "speech_recognition",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported engine: {0}")]
pub struct UnknownEngine(pub String);

impl FromStr for Engine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|engine| engine.as_str() == s)
            .ok_or_else(|| UnknownEngine(s.to_string()))
    }
}

/// Engine and language in effect for a session
///
/// The engine is kept as the raw identifier so that an unsupported value set
/// at runtime surfaces as a per-session failure rather than a rejected update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub engine: String,
    pub language: String,
}

impl EngineSettings {
    pub fn new(engine: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            engine: engine.into(),
            language: language.into(),
        }
    }
}

/// Process-wide, runtime-updatable engine settings
///
/// Readers take a full snapshot, so a session never observes an engine from
/// one update paired with a language from another.
#[derive(Debug)]
pub struct EngineState {
    inner: RwLock<EngineSettings>,
}

impl EngineState {
    pub const fn new(settings: EngineSettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    /// Copy of the settings currently in effect
    pub fn snapshot(&self) -> EngineSettings {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn language(&self) -> String {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).language.clone()
    }

    pub fn set_engine(&self, engine: impl Into<String>) {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).engine = engine.into();
    }

    pub fn set_language(&self, language: impl Into<String>) {
        self.inner.write().unwrap_or_else(PoisonError::into_inner).language = language.into();
    }
}
