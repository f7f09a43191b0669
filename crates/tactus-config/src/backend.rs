use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Remote speech-recognition backend
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL override
    #[serde(default)]
    pub base_url: Option<String>,
    /// API key sent with every recognition request
    #[serde(default)]
    pub api_key: Option<SecretString>,
}

impl BackendConfig {
    /// API key, treating an empty value as absent
    pub fn api_key(&self) -> Option<SecretString> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().is_empty())
            .cloned()
    }
}
