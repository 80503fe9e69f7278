//! Structured logging with tracing
//!
//! Logs go to stderr so that reports printed on stdout stay pipeable.
//! `APEXDOC_LOG` takes precedence over the configured level.

pub use crate::config::LoggingConfig;
use crate::{AuditError, Result};
use tracing::{Level, debug};
use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV_VAR: &str = "APEXDOC_LOG";

/// Initialize logging with the provided configuration
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));

    // Layer types differ between formats, so each branch builds its own stack.
    let result = if config.json {
        let stderr = fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr);
        Registry::default().with(filter).with(stderr).try_init()
    } else {
        let stderr = fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr);
        Registry::default().with(filter).with(stderr).try_init()
    };

    result.map_err(|e| AuditError::Config(format!("failed to initialize logging: {e}")))?;
    debug!("Logging initialized with level: {}", level);
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
        _ => Err(AuditError::Config(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}
