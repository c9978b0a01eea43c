//! The call hierarchy model seam and its LSP-backed implementation.
//!
//! A [`CallHierarchyModel`] owns the session's starting items and resolves one
//! level of incoming or outgoing calls on request. The tree adapter only ever
//! reads from it. [`LspCallHierarchyModel`] answers those requests through a
//! [`CallHierarchyClient`], the narrow seam over `callHierarchy/*` requests
//! that real language-server clients and test doubles implement.

use std::sync::Mutex;

use async_trait::async_trait;
use camino::Utf8PathBuf;
use lsp_types::{
    CallHierarchyIncomingCall, CallHierarchyIncomingCallsParams, CallHierarchyItem,
    CallHierarchyOutgoingCall, CallHierarchyOutgoingCallsParams, CallHierarchyPrepareParams,
    PartialResultParams, Position, TextDocumentIdentifier, TextDocumentPositionParams,
    WorkDoneProgressParams,
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ModelError;
use crate::uri::path_to_uri;

/// Read-only view of a call hierarchy session.
///
/// Implementations may do arbitrary work (network, IPC, disk) inside the
/// resolve methods. Failures are returned as-is to the tree host.
#[async_trait]
pub trait CallHierarchyModel: Send + Sync {
    /// Returns the items the session was started from.
    fn roots(&self) -> &[CallHierarchyItem];

    /// Resolves the calls made by `item`.
    ///
    /// # Errors
    /// Returns an error if the provider fails or the token is cancelled.
    async fn resolve_outgoing_calls(
        &self,
        item: &CallHierarchyItem,
        token: &CancellationToken,
    ) -> Result<Vec<CallHierarchyOutgoingCall>, ModelError>;

    /// Resolves the callers of `item`.
    ///
    /// # Errors
    /// Returns an error if the provider fails or the token is cancelled.
    async fn resolve_incoming_calls(
        &self,
        item: &CallHierarchyItem,
        token: &CancellationToken,
    ) -> Result<Vec<CallHierarchyIncomingCall>, ModelError>;
}

/// A position in a source file for starting a call hierarchy session.
#[derive(Debug, Clone)]
pub struct SourcePosition {
    /// Path to the source file.
    pub path: Utf8PathBuf,
    /// Line number (0-based).
    pub line: u32,
    /// Column number (0-based).
    pub column: u32,
}

impl SourcePosition {
    /// Creates a new source position.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, line: u32, column: u32) -> Self {
        Self {
            path: path.into(),
            line,
            column,
        }
    }
}

/// Client abstraction for LSP call hierarchy operations.
///
/// This trait enables testing with mock clients and abstracts over
/// different LSP client implementations.
pub trait CallHierarchyClient {
    /// Prepares call hierarchy items at the given position.
    ///
    /// # Errors
    /// Returns an error if the LSP request fails.
    fn prepare_call_hierarchy(
        &mut self,
        params: CallHierarchyPrepareParams,
    ) -> Result<Option<Vec<CallHierarchyItem>>, ModelError>;

    /// Gets incoming calls for the given item.
    ///
    /// # Errors
    /// Returns an error if the LSP request fails.
    fn incoming_calls(
        &mut self,
        params: CallHierarchyIncomingCallsParams,
    ) -> Result<Option<Vec<CallHierarchyIncomingCall>>, ModelError>;

    /// Gets outgoing calls for the given item.
    ///
    /// # Errors
    /// Returns an error if the LSP request fails.
    fn outgoing_calls(
        &mut self,
        params: CallHierarchyOutgoingCallsParams,
    ) -> Result<Option<Vec<CallHierarchyOutgoingCall>>, ModelError>;
}

/// Call hierarchy model backed by a language server client.
///
/// Client requests are synchronous; the client is locked for the duration of
/// a single request.
pub struct LspCallHierarchyModel<C> {
    client: Mutex<C>,
    roots: Vec<CallHierarchyItem>,
}

impl<C: CallHierarchyClient> LspCallHierarchyModel<C> {
    /// Starts a session at `position`, using the prepared items as roots.
    ///
    /// # Errors
    /// Returns `SymbolNotFound` when the server reports no item at the
    /// position, or the client's error if the request fails.
    pub fn prepare(mut client: C, position: &SourcePosition) -> Result<Self, ModelError> {
        let uri = path_to_uri(&position.path)?;
        let params = CallHierarchyPrepareParams {
            text_document_position_params: TextDocumentPositionParams {
                text_document: TextDocumentIdentifier { uri },
                position: Position::new(position.line, position.column),
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
        };

        let roots = client
            .prepare_call_hierarchy(params)?
            .unwrap_or_default();
        if roots.is_empty() {
            return Err(ModelError::symbol_not_found(
                &position.path,
                position.line,
                position.column,
            ));
        }

        debug!(
            target: "callscope::model",
            path = %position.path,
            roots = roots.len(),
            "prepared call hierarchy"
        );
        Ok(Self {
            client: Mutex::new(client),
            roots,
        })
    }

    /// Ends the session and hands the client back, for example to shut the
    /// server down.
    ///
    /// # Errors
    /// Returns `ClientPoisoned` if a request panicked while holding the client.
    pub fn into_client(self) -> Result<C, ModelError> {
        self.client
            .into_inner()
            .map_err(|_| ModelError::ClientPoisoned)
    }

    /// Runs one request against the client unless the token is cancelled.
    fn request<R>(
        &self,
        token: &CancellationToken,
        send: impl FnOnce(&mut C) -> Result<Option<Vec<R>>, ModelError>,
    ) -> Result<Vec<R>, ModelError> {
        if token.is_cancelled() {
            return Err(ModelError::Cancelled);
        }
        let mut client = self.client.lock().map_err(|_| ModelError::ClientPoisoned)?;
        send(&mut client).map(Option::unwrap_or_default)
    }
}

#[async_trait]
impl<C: CallHierarchyClient + Send> CallHierarchyModel for LspCallHierarchyModel<C> {
    fn roots(&self) -> &[CallHierarchyItem] {
        &self.roots
    }

    async fn resolve_outgoing_calls(
        &self,
        item: &CallHierarchyItem,
        token: &CancellationToken,
    ) -> Result<Vec<CallHierarchyOutgoingCall>, ModelError> {
        let params = CallHierarchyOutgoingCallsParams {
            item: item.clone(),
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        };
        self.request(token, |client| client.outgoing_calls(params))
    }

    async fn resolve_incoming_calls(
        &self,
        item: &CallHierarchyItem,
        token: &CancellationToken,
    ) -> Result<Vec<CallHierarchyIncomingCall>, ModelError> {
        let params = CallHierarchyIncomingCallsParams {
            item: item.clone(),
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        };
        self.request(token, |client| client.incoming_calls(params))
    }
}
