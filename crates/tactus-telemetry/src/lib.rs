//! Logging for Tactus
//!
//! Installs a `tracing-subscriber` registry with an env filter and a single
//! fmt layer, either human-readable or JSON, writing to stderr or a log file

use std::{fs::File, path::Path, sync::Mutex};

use tactus_config::{LogFormat, TelemetryConfig};
use tracing_subscriber::{EnvFilter, fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging from configuration
///
/// `log_filter` uses `EnvFilter` directive syntax; an invalid directive falls
/// back to `info`.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or a global subscriber
/// is already installed
pub fn init(config: Option<&TelemetryConfig>, log_filter: &str) -> anyhow::Result<()> {
    let format = config.map(|c| c.format).unwrap_or_default();
    let log_file = config.and_then(|c| c.log_file.as_deref());

    let (writer, ansi) = match log_file {
        Some(path) => (BoxMakeWriter::new(Mutex::new(open_log_file(path)?)), false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(ansi)
        .with_writer(writer);

    let registry = tracing_subscriber::registry().with(filter(log_filter));

    match format {
        LogFormat::Text => registry.with(fmt_layer).try_init(),
        LogFormat::Json => registry.with(fmt_layer.json()).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}

fn filter(log_filter: &str) -> EnvFilter {
    EnvFilter::try_new(log_filter).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("failed to create log directory {}: {e}", parent.display()))?;
    }

    File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| anyhow::anyhow!("failed to open log file {}: {e}", path.display()))
}
