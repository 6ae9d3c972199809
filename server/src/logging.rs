//! Tracing subscriber setup.

use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log level {directive:?}: {source}")]
    InvalidLevel {
        directive: String,
        #[source]
        source: ParseError,
    },

    #[error("failed to install tracing subscriber: {0}")]
    Init(#[from] TryInitError),
}

/// Filter from `RUST_LOG` if set, otherwise from the configured level.
pub fn build_filter(log_level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(log_level).map_err(|source| LoggingError::InvalidLevel {
        directive: log_level.to_string(),
        source,
    })
}

/// Install the global subscriber. Call once, before serving.
pub fn init_logging(config: &Config) -> Result<(), LoggingError> {
    let registry = tracing_subscriber::registry().with(build_filter(&config.log_level)?);
    match config.log_format {
        LogFormat::Pretty => registry.with(fmt::layer().with_target(true)).try_init()?,
        LogFormat::Json => registry.with(fmt::layer().json()).try_init()?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_level_and_target_directives() {
        assert!(build_filter("info").is_ok());
        assert!(build_filter("warn,item_server=debug").is_ok());
    }

    #[test]
    fn rejects_unknown_level() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = build_filter("item_server=loud").unwrap_err();
        assert!(matches!(err, LoggingError::InvalidLevel { .. }));
    }
}
