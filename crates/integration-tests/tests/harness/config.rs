//! Programmatic configuration builder for integration tests

use std::{net::SocketAddr, path::Path, time::Duration};

use tactus_config::{BackendConfig, Config, PathsConfig, RetryConfig, SessionMode};

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Minimal config with every working directory under `root` and a
    /// short retry delay
    pub fn new(root: &Path) -> Self {
        let mut config = Config::default();

        config.server.listen_address = SocketAddr::from(([127, 0, 0, 1], 0));
        config.paths = PathsConfig {
            upload_dir: root.join("temp"),
            sound_dir: root.join("temp/sound"),
            record_dir: root.join("temp/json"),
            sign_dir: root.join("signs"),
        };
        config.retry = RetryConfig {
            max_retries: 3,
            delay: Duration::from_millis(10),
        };

        Self { config }
    }

    /// Point the speech backend at a mock server
    pub fn with_backend(mut self, base_url: &str) -> Self {
        self.config.backend = BackendConfig {
            base_url: Some(base_url.to_owned()),
            api_key: Some("test-key".into()),
        };
        self
    }

    /// Set the startup recognition language
    pub fn with_language(mut self, language: &str) -> Self {
        self.config.engine.language = language.to_owned();
        self
    }

    /// Run batches on a worker pool
    pub fn with_pool(mut self, workers: usize) -> Self {
        self.config.sessions.mode = SessionMode::Pool;
        self.config.sessions.workers = workers;
        self
    }

    /// Write a JSON record per session
    pub fn with_records(mut self) -> Self {
        self.config.sessions.persist_records = true;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
