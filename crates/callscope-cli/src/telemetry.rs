//! Logging for a single `callscope` invocation.
//!
//! Rows go to stdout, so log events always go to stderr. Compact output is
//! meant to be read alongside the rows in a terminal and omits timestamps;
//! JSON output is meant for collectors and carries UTC timestamps.

use std::io::{self, IsTerminal};

use once_cell::sync::OnceCell;
use tracing::{Subscriber, subscriber::SetGlobalDefaultError};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::logging::{LogFormat, LogSettings};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Errors encountered while configuring logging.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to install the tracing subscriber.
    #[error("failed to install log subscriber: {0}")]
    Subscriber(SetGlobalDefaultError),
}

/// Builds the subscriber for `settings` without installing it.
///
/// # Errors
/// Returns an error if the filter does not parse.
pub fn build_subscriber(
    settings: &LogSettings,
    ansi: bool,
) -> Result<Box<dyn Subscriber + Send + Sync>, TelemetryError> {
    let filter = EnvFilter::try_new(&settings.filter)
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr);

    Ok(match settings.format {
        LogFormat::Json => Box::new(
            builder
                .with_ansi(false)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .json()
                .flatten_event(true)
                .finish(),
        ),
        LogFormat::Compact => Box::new(
            builder
                .with_ansi(ansi)
                .without_time()
                .with_target(false)
                .compact()
                .finish(),
        ),
    })
}

/// Installs the global subscriber on first use.
///
/// The filter is validated on every call, but only the first successful call
/// installs anything.
///
/// # Errors
/// Returns an error if the filter does not parse or another subscriber is
/// already installed.
pub fn initialise(settings: &LogSettings) -> Result<(), TelemetryError> {
    let subscriber = build_subscriber(settings, io::stderr().is_terminal())?;
    TELEMETRY_GUARD
        .get_or_try_init(|| {
            tracing::subscriber::set_global_default(subscriber)
                .map_err(TelemetryError::Subscriber)
        })
        .map(|&()| ())
}
