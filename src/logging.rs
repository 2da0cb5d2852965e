//! Tracing subscriber setup for the host binary.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;
use crate::error::LoggingError;

/// Install a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins over the configured filter when it is set and valid.
pub fn init(settings: &LoggingSettings) -> Result<(), LoggingError> {
    let filter = build_filter(settings)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(settings.with_target)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}

fn build_filter(settings: &LoggingSettings) -> Result<EnvFilter, LoggingError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(&settings.filter)?),
    }
}
