//! Command-line runtime for the callscope call hierarchy explorer.
//!
//! A run parses arguments, installs logging, opens a model (a JSON fixture or
//! a language server), expands the call tree to the requested depth and
//! prints it. The entry point takes its IO streams as arguments so tests can
//! capture them.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use callscope_tree::{CallDataSource, CallTree, SessionContext};
use clap::Parser;
use tracing::debug;

mod cli;
pub mod defaults;
mod errors;
mod logging;
mod output;
mod source;
pub mod telemetry;

pub use cli::{OutputFormat, ResolvedOutputFormat};
use cli::Cli;
use errors::AppError;
pub use logging::{LogFormat, LogSettings};
use source::OpenedModel;

/// Runs the CLI using the provided arguments and IO handles.
///
/// `stdout_is_terminal` decides what `--output auto` resolves to.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E, stdout_is_terminal: bool) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let result = Cli::try_parse_from(args)
        .map_err(AppError::CliUsage)
        .and_then(|cli| execute(&cli, stdout, stdout_is_terminal));

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::CliUsage(error)) if !error.use_stderr() => {
            let _ = write!(stdout, "{error}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn execute<W: Write>(cli: &Cli, stdout: &mut W, stdout_is_terminal: bool) -> Result<(), AppError> {
    telemetry::initialise(&cli.log_settings())?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .map_err(AppError::Runtime)?;

    let opened = OpenedModel::open(&cli.source)?;
    let session = Arc::new(SessionContext::new(cli.direction));
    let tree = CallTree::new(CallDataSource::new(opened.shared(), session));
    let expanded = runtime.block_on(tree.expand(cli.depth));
    drop(tree);
    opened.close();

    let rows = expanded?;
    debug!(
        target: "callscope::cli",
        direction = %cli.direction,
        depth = cli.depth,
        rows = rows.len(),
        "expanded call tree"
    );
    output::write_rows(stdout, &rows, cli.output.resolve(stdout_is_terminal))
}

#[cfg(test)]
mod tests;
