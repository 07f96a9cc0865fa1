//! Console and optional rolling-file tracing setup.

use std::{fs, io};

use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Logger;

const LOG_FILE_PREFIX: &str = "customerd.log";

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over the configured level. When a directory is configured
/// a daily rolling file layer is added; keep the returned guard alive for the
/// life of the process or buffered lines are lost. Calling this twice is a
/// no-op for the second call.
pub fn init(config: &Logger) -> io::Result<Option<WorkerGuard>> {
    let default_level = tracing::Level::from(config.level);
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()));

    let stdout_layer = fmt::layer().with_target(false);

    let (file_layer, guard) = match &config.directory {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let (writer, guard) =
                tracing_appender::non_blocking(rolling::daily(dir, LOG_FILE_PREFIX));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer);

    match subscriber.try_init() {
        Ok(()) => Ok(guard),
        // Already installed elsewhere; dropping the guard stops the file writer.
        Err(_) => Ok(None),
    }
}
