//! Logging initialisation
//!
//! The terminal belongs to the UI, so logs go to a file through a
//! non-blocking writer. The returned guard flushes buffered lines when it
//! drops; keep it alive for the whole process.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_FILTER: &str = "pongterm=info";

pub struct LogGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Resolve the filter: `RUST_LOG`, then the configured one, then the default
fn filter(configured: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(configured.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to `path`.
///
/// Without a usable path logging is disabled rather than written over the
/// UI.
pub fn init(path: Option<&Path>, configured_filter: Option<&str>) -> LogGuard {
    let Some((dir, file)) = path.and_then(|p| Some((p.parent()?, p.file_name()?))) else {
        return LogGuard { _file_guard: None };
    };
    if std::fs::create_dir_all(dir).is_err() {
        return LogGuard { _file_guard: None };
    }

    let file_appender = tracing_appender::rolling::never(dir, file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter(configured_filter))
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(non_blocking),
        )
        .init();

    LogGuard {
        _file_guard: Some(guard),
    }
}
