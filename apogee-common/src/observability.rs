//! Shared observability helpers for the harvester binary and tests.
//!
//! The logging initializer centralises our `tracing` setup so every
//! entrypoint emits the same way: a stdout fmt layer, plus an optional
//! rolling file sink. Call [`init_logging`] once near process start;
//! additional calls are treated as no-ops.

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Configuration passed to [`init_logging`].
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Logical name of the component (used for log file names).
    pub app_name: &'static str,
    /// Optional directory for a daily-rolling file sink in addition to
    /// stdout. If `None`, `APOGEE_LOG_DIR` is consulted; unset means stdout
    /// only.
    pub log_dir: Option<PathBuf>,
    /// Default filter applied when `RUST_LOG` is unset.
    pub default_filter: &'static str,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            app_name: "apogee",
            log_dir: None,
            default_filter: "info",
        }
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Returns the file sink directory when one was configured. Subsequent calls
/// are cheap no-ops.
pub fn init_logging(config: LogConfig) -> anyhow::Result<Option<PathBuf>> {
    if INITIALIZED.get().is_some() {
        return Ok(None);
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.default_filter));

    let file_dir = config
        .log_dir
        .or_else(|| std::env::var("APOGEE_LOG_DIR").ok().map(PathBuf::from));

    let file_layer = match &file_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory: {}", dir.display()))?;
            let appender = rolling::daily(dir, format!("{}.log", config.app_name));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            Some(fmt::layer().with_writer(writer).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing setup failed: {e}"))?;

    let _ = INITIALIZED.set(());
    Ok(file_dir)
}
