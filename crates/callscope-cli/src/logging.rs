//! Logging configuration.

use strum::{Display, EnumString};

/// Supported logging output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    Json,
    /// Human-readable single line output.
    #[default]
    Compact,
}

/// Logging settings resolved from the command line.
#[derive(Debug, Clone)]
pub struct LogSettings {
    /// `tracing_subscriber::EnvFilter` directive string.
    pub filter: String,
    /// Output format for log events.
    pub format: LogFormat,
}
