//! CLI entrypoint for the callscope call hierarchy explorer.
//!
//! The binary delegates to [`callscope_cli::run`], which parses arguments,
//! installs logging, builds the requested model and prints the expanded tree.

use std::io::{self, IsTerminal, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let stdout_is_terminal = io::stdout().is_terminal();
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    callscope_cli::run(
        std::env::args_os(),
        &mut stdout,
        &mut stderr,
        stdout_is_terminal,
    )
}
