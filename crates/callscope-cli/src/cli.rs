//! Command-line argument definitions.

use callscope_tree::Direction;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};

use crate::defaults::{
    DEFAULT_DEPTH, DEFAULT_DIRECTION, DEFAULT_LANGUAGE_ID, DEFAULT_LOG_FILTER, DEFAULT_LOG_FORMAT,
};
use crate::logging::{LogFormat, LogSettings};

/// Output format selection for the expanded tree.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render an indented text tree.
    Human,
    /// Always emit the rows as a JSON array.
    Json,
}

/// Output format after terminal detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Indented text tree.
    Human,
    /// JSON array of rows.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto => {
                if stdout_is_terminal {
                    ResolvedOutputFormat::Human
                } else {
                    ResolvedOutputFormat::Json
                }
            }
            Self::Human => ResolvedOutputFormat::Human,
            Self::Json => ResolvedOutputFormat::Json,
        }
    }
}

/// Explores the callers or callees of a symbol.
#[derive(Parser, Debug)]
#[command(name = "callscope", version, disable_help_subcommand = true)]
pub(crate) struct Cli {
    /// `outgoing` lists what each symbol calls; `incoming` lists its callers.
    #[arg(long, global = true, default_value_t = DEFAULT_DIRECTION)]
    pub(crate) direction: Direction,
    /// Number of levels expanded below the roots.
    #[arg(long, global = true, default_value_t = DEFAULT_DEPTH)]
    pub(crate) depth: usize,
    /// Controls how the tree is rendered.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub(crate) output: OutputFormat,
    /// Log filter directives, for example `callscope=debug`.
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILTER)]
    pub(crate) log_filter: String,
    /// Log output format (`json` or `compact`).
    #[arg(long, global = true, default_value_t = DEFAULT_LOG_FORMAT)]
    pub(crate) log_format: LogFormat,
    /// Where call hierarchy data comes from.
    #[command(subcommand)]
    pub(crate) source: Source,
}

impl Cli {
    pub(crate) fn log_settings(&self) -> LogSettings {
        LogSettings {
            filter: self.log_filter.clone(),
            format: self.log_format,
        }
    }
}

/// Call hierarchy sources.
#[derive(Subcommand, Debug, Clone)]
pub(crate) enum Source {
    /// Reads a JSON call graph fixture.
    Fixture {
        /// Path to the fixture file.
        path: Utf8PathBuf,
    },
    /// Asks a language server, starting at a position in a source file.
    Lsp {
        /// Source file containing the starting symbol.
        #[arg(long)]
        file: Utf8PathBuf,
        /// Line of the symbol (0-based).
        #[arg(long)]
        line: u32,
        /// Column of the symbol (0-based).
        #[arg(long)]
        column: u32,
        /// Language identifier sent when opening the file.
        #[arg(long, default_value = DEFAULT_LANGUAGE_ID)]
        language_id: String,
        /// Language server command followed by its arguments.
        #[arg(required = true, num_args = 1.., last = true, value_name = "SERVER")]
        server: Vec<String>,
    },
}
