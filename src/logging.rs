//! File logging for the picker.
//!
//! The picker owns the terminal while it runs, so records go to a daily
//! rotating file through a background writer. Nothing is written to stdout,
//! which carries the final selection.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Directives used when `RUST_LOG` is unset or invalid.
const DEFAULT_LOG_FILTER: &str = "multipick=info,warn";

/// File name prefix; the appender adds the date.
const LOG_FILE_PREFIX: &str = "multipick.log";

/// Install the global subscriber writing to `<data_local_dir>/multipick/logs`.
///
/// The returned guard flushes buffered records when dropped, so keep it alive
/// until the terminal has been restored.
///
/// `RUST_LOG=multipick=debug` logs widget state changes,
/// `RUST_LOG=multipick=trace` every key and filter commit.
pub fn init() -> anyhow::Result<WorkerGuard> {
    let log_dir = log_directory()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = build_filter(std::env::var("RUST_LOG").ok().as_deref());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .try_init()?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), log_dir = %log_dir.display(), "multipick starting up");
    Ok(guard)
}

/// Parse `directives`, falling back to the defaults when absent or malformed.
fn build_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Where log files are written, for telling the user.
pub fn log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| base.join("multipick").join("logs"))
}
