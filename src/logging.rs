//! Logging initialisation for bezel-preview.
//!
//! With `BEZEL_PREVIEW_LOG=1` logs also go to `bezel-preview.log` in the OS
//! log directory and the default level rises to `info`. Otherwise only
//! stderr output (filtered by `RUST_LOG`, default `warn`) is enabled.

use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "BEZEL_PREVIEW_LOG";
const LOG_FILE: &str = "bezel-preview.log";

/// Keep alive for the whole process so buffered lines are flushed on exit.
pub struct LogGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Install the global tracing subscriber. Call once from `main`.
pub fn init() -> LogGuard {
    let file_logging = std::env::var(LOG_ENV).as_deref() == Ok("1");
    let default_level = if file_logging { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_guard = if file_logging {
        let dir = log_dir().unwrap_or_else(std::env::temp_dir);
        let _ = std::fs::create_dir_all(&dir);
        let (non_blocking, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(&dir, LOG_FILE));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
            .init();

        Some(guard)
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();

        None
    };

    LogGuard {
        _file_guard: file_guard,
    }
}

fn log_dir() -> Option<PathBuf> {
    let home = PathBuf::from(std::env::var("HOME").ok()?);
    #[cfg(target_os = "macos")]
    {
        Some(home.join("Library").join("Logs").join("bezel-preview"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        let base = std::env::var("XDG_STATE_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| home.join(".local").join("state"));
        Some(base.join("bezel-preview"))
    }
}
