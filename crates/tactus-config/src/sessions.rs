use serde::Deserialize;

/// How a batch of sessions is executed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// One session after another on the calling task
    #[default]
    Sequential,
    /// Up to `workers` sessions in flight at once
    Pool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionsConfig {
    #[serde(default)]
    pub mode: SessionMode,
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// Write each session result as JSON under the record directory
    #[serde(default)]
    pub persist_records: bool,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            mode: SessionMode::default(),
            workers: default_workers(),
            persist_records: false,
        }
    }
}

const fn default_workers() -> usize {
    4
}
