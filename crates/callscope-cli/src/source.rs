//! Builds the call hierarchy model a run explores.

use std::sync::Arc;

use callscope_lsp::LspClient;
use callscope_tree::{
    CallHierarchyModel, LspCallHierarchyModel, SourcePosition, StaticCallHierarchyModel,
    path_to_uri,
};
use camino::Utf8PathBuf;
use tracing::{debug, warn};

use crate::cli::Source;
use crate::errors::AppError;

/// A model opened for one run, kept concrete so it can be closed afterwards.
pub(crate) enum OpenedModel {
    Fixture(Arc<StaticCallHierarchyModel>),
    Lsp(Arc<LspCallHierarchyModel<LspClient>>),
}

impl OpenedModel {
    pub(crate) fn open(source: &Source) -> Result<Self, AppError> {
        match source {
            Source::Fixture { path } => {
                let model = StaticCallHierarchyModel::load(path)?;
                debug!(
                    target: "callscope::cli",
                    %path,
                    roots = model.roots().len(),
                    "loaded fixture"
                );
                Ok(Self::Fixture(Arc::new(model)))
            }
            Source::Lsp {
                file,
                line,
                column,
                language_id,
                server,
            } => {
                let working_dir = working_directory()?;
                let path = working_dir.join(file);
                let text = std::fs::read_to_string(&path).map_err(|source| {
                    AppError::ReadSource {
                        path: path.clone(),
                        source,
                    }
                })?;

                let (command, args) = server
                    .split_first()
                    .ok_or_else(|| AppError::CliUsage(missing_server_error()))?;
                let mut client = LspClient::spawn(command, args)?;
                client.initialize(path_to_uri(&working_dir)?)?;
                client.did_open(path_to_uri(&path)?, language_id, &text)?;

                let position = SourcePosition::new(path, *line, *column);
                let model = LspCallHierarchyModel::prepare(client, &position)?;
                Ok(Self::Lsp(Arc::new(model)))
            }
        }
    }

    pub(crate) fn shared(&self) -> Arc<dyn CallHierarchyModel> {
        match self {
            Self::Fixture(model) => Arc::clone(model) as Arc<dyn CallHierarchyModel>,
            Self::Lsp(model) => Arc::clone(model) as Arc<dyn CallHierarchyModel>,
        }
    }

    /// Shuts down a language server once no tree node still refers to it.
    pub(crate) fn close(self) {
        let Self::Lsp(shared) = self else {
            return;
        };
        let Ok(model) = Arc::try_unwrap(shared) else {
            warn!(target: "callscope::cli", "call tree still in use; killing language server");
            return;
        };
        match model.into_client().map(|mut client| client.shutdown()) {
            Ok(Ok(())) => debug!(target: "callscope::cli", "language server shut down"),
            Ok(Err(error)) => {
                warn!(target: "callscope::cli", %error, "language server shutdown failed");
            }
            Err(error) => warn!(target: "callscope::cli", %error, "language server client lost"),
        }
    }
}

fn working_directory() -> Result<Utf8PathBuf, AppError> {
    let dir = std::env::current_dir().map_err(AppError::WorkingDirectory)?;
    Utf8PathBuf::try_from(dir).map_err(|error| AppError::WorkingDirectory(error.into_io_error()))
}

fn missing_server_error() -> clap::Error {
    clap::Error::raw(
        clap::error::ErrorKind::MissingRequiredArgument,
        "a language server command is required after `--`",
    )
}
