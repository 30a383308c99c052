// Logger initialization: stdout always, plus a daily rolling file when LOG_DIR is set

use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::LoggingConfig;

const DEFAULT_FILTER: &str = "trip_planner=debug,tower_http=debug,axum=debug";
const LOG_FILE_NAME: &str = "trip-planner.log";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
///
/// The returned guard flushes the file writer on drop, so keep it alive
/// for the life of the process.
pub fn init_logger(config: &LoggingConfig) -> Option<WorkerGuard> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let mut layers = vec![tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .boxed()];

    let mut guard = None;
    let mut dir_error = None;
    if let Some(log_dir) = &config.log_dir {
        match std::fs::create_dir_all(log_dir) {
            Ok(()) => {
                let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, LOG_FILE_NAME);
                let (writer, file_guard) = tracing_appender::non_blocking(appender);
                guard = Some(file_guard);
                layers.push(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer)
                        .boxed(),
                );
            }
            Err(e) => dir_error = Some(e),
        }
    }

    // already installed (tests, repeated CLI setup) is fine
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init();

    if let (Some(e), Some(dir)) = (dir_error, &config.log_dir) {
        warn!(log_dir = %dir.display(), error = %e, "Could not create log directory, logging to stderr only");
    }

    guard
}
