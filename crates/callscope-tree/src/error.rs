//! Error types for call hierarchy models.
//!
//! The tree adapter never translates these: whatever the model returns is
//! handed to the tree host unchanged.

use std::error::Error as StdError;
use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Boxed provider failure carried through [`ModelError::Provider`].
pub type ProviderSource = Box<dyn StdError + Send + Sync + 'static>;

/// Errors returned by [`crate::CallHierarchyModel`] implementations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The backing provider (for example a language server) failed.
    #[error("call hierarchy provider failed: {message}")]
    Provider {
        /// Short description of the failed request.
        message: String,
        /// Underlying provider error.
        #[source]
        source: ProviderSource,
    },

    /// No call hierarchy item exists at the requested position.
    #[error("no symbol found at {path}:{line}:{column}")]
    SymbolNotFound {
        /// Path to the file containing the position.
        path: Utf8PathBuf,
        /// Line number (0-based).
        line: u32,
        /// Column number (0-based).
        column: u32,
    },

    /// The request was cancelled before it reached the provider.
    #[error("call hierarchy request was cancelled")]
    Cancelled,

    /// A previous request panicked while holding the client.
    #[error("call hierarchy client is unavailable after a failed request")]
    ClientPoisoned,

    /// A call graph fixture could not be parsed or is inconsistent.
    #[error("invalid call graph fixture: {0}")]
    Fixture(String),

    /// An IO error occurred while loading model data.
    #[error("IO error: {message}")]
    Io {
        /// Description of the IO error.
        message: String,
        /// Underlying error wrapped in Arc for Clone support.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl ModelError {
    /// Creates a new `Provider` error.
    #[must_use]
    pub fn provider(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Provider {
            message: message.into(),
            source: Box::new(source),
        }
    }

    /// Creates a new `SymbolNotFound` error.
    #[must_use]
    pub fn symbol_not_found(path: impl Into<Utf8PathBuf>, line: u32, column: u32) -> Self {
        Self::SymbolNotFound {
            path: path.into(),
            line,
            column,
        }
    }

    /// Creates a new `Fixture` error.
    #[must_use]
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture(message.into())
    }

    /// Creates a new `Io` error.
    #[must_use]
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source: Arc::new(source),
        }
    }
}
