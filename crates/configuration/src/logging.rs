use crate::error::ConfigError;
use crate::settings::Settings;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_FILE_PREFIX: &str = "rollcall.log";

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `settings.log_level`. When `settings.log_dir` is
/// set, events are mirrored to a daily rolling file; the returned guard must be held
/// for the life of the process so buffered lines are flushed on exit.
pub fn init_tracing(settings: &Settings) -> Result<Option<WorkerGuard>, ConfigError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.log_level).map_err(|e| {
            ConfigError::ValidationError(format!("Invalid log level '{}': {e}", settings.log_level))
        })?,
    };

    let registry = tracing_subscriber::registry().with(filter).with(fmt::layer());

    match &settings.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;
            Ok(Some(guard))
        }
        None => {
            registry
                .try_init()
                .map_err(|e| ConfigError::LoggingError(e.to_string()))?;
            Ok(None)
        }
    }
}
