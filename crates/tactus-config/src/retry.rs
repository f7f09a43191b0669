use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Bounded, fixed-delay retry for transient backend failures
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts, including the first
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Pause between attempts (e.g. "1s", "250ms")
    #[serde(default = "default_delay", deserialize_with = "deserialize_delay")]
    pub delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay: default_delay(),
        }
    }
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_delay() -> Duration {
    Duration::from_secs(1)
}

fn deserialize_delay<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    duration_str::parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid duration '{raw}': {e}")))
}
