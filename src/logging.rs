//! File-based logging for subsonic-tui
//!
//! The TUI owns the terminal, so every diagnostic goes to a daily log file under
//! `.logs/` instead of stdout.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "subsonic-tui";
const DEFAULT_FILTER: &str = "subsonic_tui=debug,reqwest=info,warn";

/// Initialize the logging system.
///
/// Logs are written to `.logs/subsonic-tui.YYYY-MM-DD.log`. `RUST_LOG` overrides
/// the default filter. The returned guard flushes the writer when dropped, so
/// keep it alive until the program exits.
pub fn init_logging() -> anyhow::Result<WorkerGuard> {
    let log_dir = Path::new(LOG_DIR);
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(dir = LOG_DIR, "Logging initialized");
    Ok(guard)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Log the outcome of a catalog request
#[macro_export]
macro_rules! log_api_result {
    ($endpoint:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::debug!(endpoint = $endpoint, "Catalog request succeeded"),
            Err(e) => tracing::warn!(endpoint = $endpoint, error = %e, "Catalog request failed"),
        }
    };
}

/// Log the start of a catalog request with extra fields
#[macro_export]
macro_rules! log_api_request {
    ($endpoint:expr) => {
        tracing::debug!(endpoint = $endpoint, "Catalog request started");
    };
    ($endpoint:expr, $($field:tt)*) => {
        tracing::debug!(endpoint = $endpoint, $($field)*, "Catalog request started");
    };
}
