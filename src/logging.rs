//! Global tracing subscriber: rolling log file, plus colored stdout in text mode.

use crate::config::AppConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Map the configured `rotation` name to a file rotation.
pub fn parse_rotation(name: &str) -> Option<Rotation> {
    match name {
        "hourly" => Some(Rotation::HOURLY),
        "daily" => Some(Rotation::DAILY),
        "never" => Some(Rotation::NEVER),
        _ => None,
    }
}

/// Filter used when `RUST_LOG` is unset: the configured level for our
/// own events, warnings only for the database driver.
pub fn default_filter(level: &str) -> String {
    format!("{},sqlx=warn", level)
}

/// `RUST_LOG` if it parses, else [`default_filter`].
fn build_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter(level)))
}

/// Install the global subscriber. Keep the guard alive until exit.
pub fn init_logging(config: &AppConfig) -> WorkerGuard {
    // validated at load time
    let rotation = parse_rotation(&config.rotation).unwrap_or(Rotation::NEVER);
    let file_appender = RollingFileAppender::new(rotation, &config.log_dir, &config.log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let registry =
        tracing_subscriber::registry().with(build_filter(rust_log.as_deref(), &config.log_level));

    if config.use_json {
        // one structured stream, targets kept for querying
        let file_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(non_blocking)
            .with_ansi(false);
        registry.with(file_layer).init();
    } else {
        let file_layer = fmt::layer()
            .with_target(false)
            .with_writer(non_blocking)
            .with_ansi(false);
        let stdout_layer = fmt::layer().with_target(false).with_ansi(true);
        registry.with(file_layer).with(stdout_layer).init();
    }

    guard
}
