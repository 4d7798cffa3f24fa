//! Structured logging with tracing
//!
//! Configures the tracing subscriber from `general.logging`: level,
//! text or JSON format, and optional daily-rotated file output. The
//! `ORBIT_LOG` environment variable overrides the configured filter.

use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use orbit_domain::error::{Error, Result};

// Re-export LoggingConfig for convenience
pub use crate::config::LoggingConfig;

/// Initialize logging with the provided configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter = create_log_filter(&config.level);
    let file_appender = create_file_appender(config.file_output.as_deref());

    if config.json_format {
        init_json_logging(filter, file_appender)?;
    } else {
        init_text_logging(filter, file_appender)?;
    }

    info!("Logging initialized with level: {}", level);
    Ok(())
}

/// Create log filter from configuration
fn create_log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_env("ORBIT_LOG").unwrap_or_else(|_| EnvFilter::new(level))
}

/// Create file appender if file output is configured
fn create_file_appender(
    file_output: Option<&std::path::Path>,
) -> Option<tracing_appender::rolling::RollingFileAppender> {
    file_output.map(|path| {
        tracing_appender::rolling::daily(
            path.parent().unwrap_or_else(|| std::path::Path::new(".")),
            path.file_stem()
                .unwrap_or_else(|| std::ffi::OsStr::new("orbit")),
        )
    })
}

/// Initialize logging with JSON format
fn init_json_logging(
    filter: EnvFilter,
    file_appender: Option<tracing_appender::rolling::RollingFileAppender>,
) -> Result<()> {
    let stdout = fmt::layer().json().with_target(true);
    let registry = Registry::default().with(filter);
    if let Some(appender) = file_appender {
        let file = fmt::layer()
            .json()
            .with_writer(appender)
            .with_ansi(false)
            .with_target(true);
        registry.with(stdout).with(file).init();
    } else {
        registry.with(stdout).init();
    }
    Ok(())
}

/// Initialize logging with text format
fn init_text_logging(
    filter: EnvFilter,
    file_appender: Option<tracing_appender::rolling::RollingFileAppender>,
) -> Result<()> {
    let stdout = fmt::layer().with_target(true);
    let registry = Registry::default().with(filter);
    if let Some(appender) = file_appender {
        let file = fmt::layer()
            .with_writer(appender)
            .with_ansi(false)
            .with_target(true);
        registry.with(stdout).with(file).init();
    } else {
        registry.with(stdout).init();
    }
    Ok(())
}

/// Parse log level string to tracing Level
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::config(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}
