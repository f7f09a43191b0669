#![allow(clippy::must_use_candidate)]

mod engine;
mod error;
mod info;

pub use engine::{Engine, EngineSettings, EngineState, UnknownEngine};
pub use error::{ErrorBody, ErrorDetails, HttpError};
pub use info::{InfoResponse, ServiceInfo};
