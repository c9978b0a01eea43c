//! Error types for the CLI runtime.

use std::io;

use callscope_lsp::LspClientError;
use callscope_tree::ModelError;
use camino::Utf8PathBuf;
use thiserror::Error;

use crate::telemetry::TelemetryError;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("failed to start the async runtime: {0}")]
    Runtime(io::Error),
    #[error("failed to resolve the working directory: {0}")]
    WorkingDirectory(io::Error),
    #[error("failed to read {path}: {source}")]
    ReadSource { path: Utf8PathBuf, source: io::Error },
    #[error("language server failed: {0}")]
    LanguageServer(#[from] LspClientError),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("failed to serialise call tree: {0}")]
    SerialiseRows(serde_json::Error),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
}
