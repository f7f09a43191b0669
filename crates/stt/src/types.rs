use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Extension of the canonical uncompressed format
pub const CANONICAL_EXTENSION: &str = "wav";

/// How an input file is brought into canonical form, decided by extension only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioKind {
    /// Already PCM WAV; used as is
    Wav,
    /// Lossy-compressed audio with a single stream
    LossyAudio,
    /// Any other container, possibly carrying video alongside the audio
    MediaContainer,
}

impl AudioKind {
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            CANONICAL_EXTENSION => Self::Wav,
            "mp3" => Self::LossyAudio,
            _ => Self::MediaContainer,
        }
    }
}

/// A single input file handed to a session
#[derive(Debug, Clone)]
pub struct AudioSource {
    pub path: PathBuf,
    pub kind: AudioKind,
}

impl AudioSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let kind = AudioKind::from_path(&path);
        Self { path, kind }
    }

    /// Base file name without its extension
    pub fn session_name(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "audio".to_string())
    }
}

/// Result of bringing a source into canonical form
///
/// When `was_transcoded` is false, `normalized_path` is the source path itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationOutcome {
    pub normalized_path: PathBuf,
    pub was_transcoded: bool,
}

/// Why a session produced no transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    TranscodeError,
    UnsupportedEngine,
    Unintelligible,
    ServiceRequestFailed,
    Unexpected,
}

/// Outcome of one transcription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranscriptionResult {
    Transcribed {
        text: String,
        /// Canonical WAV the transcript was produced from
        audio: PathBuf,
    },
    Failed {
        kind: ErrorKind,
        #[serde(rename = "error")]
        message: String,
    },
}

impl TranscriptionResult {
    pub fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            message: message.into(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Transcribed { text, .. } => Some(text),
            Self::Failed { .. } => None,
        }
    }

    pub const fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Transcribed { .. } => None,
            Self::Failed { kind, .. } => Some(*kind),
        }
    }
}

/// Everything a caller needs after a session
///
/// `normalized_path` equals the input when no transcoding happened, and is
/// `None` only when normalization failed. The caller owns cleanup.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub result: TranscriptionResult,
    pub record_path: Option<PathBuf>,
    pub normalized_path: Option<PathBuf>,
}

/// Base64-encoded audio upload
#[derive(Debug, Deserialize)]
pub struct Base64Audio {
    pub filename: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct EngineQuery {
    #[serde(default)]
    pub engine: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    #[serde(default)]
    pub language: String,
}
