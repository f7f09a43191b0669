use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Tactus accessibility service
#[derive(Debug, Parser)]
#[command(name = "tactus", about = "Speech-to-text, Braille and sign-language HTTP service")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "tactus.toml", env = "TACTUS_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "TACTUS_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directives, e.g. `info` or `stt=debug,tower_http=info`
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    pub log_filter: String,
}
