use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::EngineState;

/// Envelope returned by every successful API call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    /// Configured service name
    pub service: String,
    /// Human-readable outcome
    pub message: String,
    /// Recognition language active when the response was built
    pub language: String,
    /// Endpoint-specific payload
    #[serde(default)]
    pub results: Option<serde_json::Value>,
}

impl InfoResponse {
    pub fn new(service: impl Into<String>, message: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            message: message.into(),
            language: language.into(),
            results: None,
        }
    }

    #[must_use]
    pub fn with_results(mut self, results: serde_json::Value) -> Self {
        self.results = Some(results);
        self
    }
}

/// Builds response envelopes from the service name and live engine state
#[derive(Debug, Clone)]
pub struct ServiceInfo {
    service: Arc<str>,
    engine: Arc<EngineState>,
}

impl ServiceInfo {
    pub fn new(service: impl Into<Arc<str>>, engine: Arc<EngineState>) -> Self {
        Self {
            service: service.into(),
            engine,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn engine(&self) -> &Arc<EngineState> {
        &self.engine
    }

    /// Envelope carrying the language in effect right now
    pub fn respond(&self, message: impl Into<String>) -> InfoResponse {
        InfoResponse::new(self.service.as_ref(), message, self.engine.language())
    }
}
