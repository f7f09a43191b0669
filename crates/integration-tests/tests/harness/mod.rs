//! Shared helpers for the end-to-end tests; each test binary uses a subset
#![allow(dead_code)]

pub mod audio;
pub mod config;
pub mod mock_speech;
pub mod server;
