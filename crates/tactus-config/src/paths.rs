use std::path::PathBuf;

use serde::Deserialize;

/// Working directories used by the speech and sign pipelines
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Scratch location for uploaded files
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Normalized WAV output
    #[serde(default = "default_sound_dir")]
    pub sound_dir: PathBuf,
    /// Persisted session records
    #[serde(default = "default_record_dir")]
    pub record_dir: PathBuf,
    /// Sign-language image library, scanned once at startup
    #[serde(default = "default_sign_dir")]
    pub sign_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            upload_dir: default_upload_dir(),
            sound_dir: default_sound_dir(),
            record_dir: default_record_dir(),
            sign_dir: default_sign_dir(),
        }
    }
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("temp")
}

fn default_sound_dir() -> PathBuf {
    PathBuf::from("temp/sound")
}

fn default_record_dir() -> PathBuf {
    PathBuf::from("temp/json")
}

fn default_sign_dir() -> PathBuf {
    PathBuf::from("assets/Signs/Indian")
}
