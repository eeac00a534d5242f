//! Tracing subscriber setup.
//!
//! Log lines go to stderr so stdout stays clean for the rendered tables. Verbosity comes from
//! `RUST_LOG` (default `warn`); `AQI_LOG_DIR` additionally enables a daily rolling log file.

use crate::config::{LogConfig, LogFormat};
use crate::error::{AppError, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "climate-aqi.log";

/// Installs the global subscriber.
///
/// The returned guard flushes the file writer on drop and must be kept alive until exit.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let (installed, guard) = match &config.directory {
        Some(directory) => {
            let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let builder = builder.with_writer(writer).with_ansi(false);
            let installed = match config.format {
                LogFormat::Json => builder.json().try_init(),
                LogFormat::Pretty => builder.try_init(),
            };
            (installed, Some(guard))
        },
        None => {
            let builder = builder.with_writer(std::io::stderr);
            let installed = match config.format {
                LogFormat::Json => builder.json().try_init(),
                LogFormat::Pretty => builder.try_init(),
            };
            (installed, None)
        },
    };

    installed.map_err(|e| AppError::Config(format!("Failed to initialise logging: {}", e)))?;
    Ok(guard)
}
