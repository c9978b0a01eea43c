//! A blocking LSP client speaking JSON-RPC over a pair of byte streams.

use std::fmt;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::process::{Child, Command, Stdio};

use callscope_tree::{CallHierarchyClient, ModelError};
use lsp_types::{
    CallHierarchyClientCapabilities, CallHierarchyIncomingCall, CallHierarchyIncomingCallsParams,
    CallHierarchyItem, CallHierarchyOutgoingCall, CallHierarchyOutgoingCallsParams,
    CallHierarchyPrepareParams, ClientCapabilities, DidOpenTextDocumentParams, InitializeParams,
    InitializeResult, TextDocumentClientCapabilities, TextDocumentItem, Uri, WorkspaceFolder,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, trace, warn};

use crate::error::LspClientError;
use crate::jsonrpc::{Notification, Request, read_message, write_message};

/// Maximum number of messages to read before giving up on finding a response.
pub const MAX_RESPONSE_ITERATIONS: usize = 1000;

const LOG_TARGET: &str = "callscope::lsp";

/// A language server client.
///
/// Requests are synchronous: each call writes one message and reads until the
/// matching response arrives, skipping notifications and unrelated replies.
pub struct LspClient {
    child: Option<Child>,
    reader: Box<dyn BufRead + Send>,
    writer: Box<dyn Write + Send>,
    next_id: i64,
    initialised: bool,
}

impl fmt::Debug for LspClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LspClient")
            .field("pid", &self.child.as_ref().map(Child::id))
            .field("next_id", &self.next_id)
            .field("initialised", &self.initialised)
            .finish_non_exhaustive()
    }
}

impl LspClient {
    /// Spawns a new language server process.
    ///
    /// The server's stderr is discarded.
    ///
    /// # Errors
    /// Returns an error if the process cannot be spawned.
    pub fn spawn(cmd: &str, args: &[String]) -> Result<Self, LspClientError> {
        let mut child = Command::new(cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(LspClientError::SpawnFailed)?;

        let stdin = child.stdin.take().ok_or_else(|| {
            LspClientError::protocol(ErrorKind::BrokenPipe, "stdin not available")
        })?;
        let stdout = child.stdout.take().ok_or_else(|| {
            LspClientError::protocol(ErrorKind::BrokenPipe, "stdout not available")
        })?;

        debug!(target: LOG_TARGET, command = cmd, pid = child.id(), "spawned language server");
        let mut client = Self::from_streams(BufReader::new(stdout), BufWriter::new(stdin));
        client.child = Some(child);
        Ok(client)
    }

    /// Builds a client over existing streams, for example an in-memory
    /// transcript or a socket.
    #[must_use]
    pub fn from_streams(
        reader: impl BufRead + Send + 'static,
        writer: impl Write + Send + 'static,
    ) -> Self {
        Self {
            child: None,
            reader: Box::new(reader),
            writer: Box::new(writer),
            next_id: 1,
            initialised: false,
        }
    }

    /// Returns true once [`Self::initialize`] has succeeded.
    #[must_use]
    pub const fn is_initialised(&self) -> bool {
        self.initialised
    }

    /// Initialises the language server.
    ///
    /// # Errors
    /// Returns an error if initialisation fails.
    #[expect(deprecated, reason = "root_uri kept for server compatibility")]
    pub fn initialize(&mut self, root_uri: Uri) -> Result<InitializeResult, LspClientError> {
        let params = InitializeParams {
            process_id: Some(std::process::id()),
            root_uri: Some(root_uri.clone()),
            capabilities: client_capabilities(),
            workspace_folders: Some(vec![WorkspaceFolder {
                uri: root_uri,
                name: String::from("workspace"),
            }]),
            ..Default::default()
        };

        let result: InitializeResult = self.request("initialize", Some(to_value(&params)?))?;
        self.notify("initialized", Some(json!({})))?;
        self.initialised = true;
        Ok(result)
    }

    /// Opens a document in the language server.
    ///
    /// # Errors
    /// Returns an error if the client is not initialised or if the
    /// notification fails.
    pub fn did_open(
        &mut self,
        uri: Uri,
        language_id: &str,
        text: &str,
    ) -> Result<(), LspClientError> {
        self.require_initialised()?;
        let params = DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri,
                language_id: language_id.to_owned(),
                version: 1,
                text: text.to_owned(),
            },
        };
        self.notify("textDocument/didOpen", Some(to_value(&params)?))
    }

    /// Shuts down the language server and waits for the process to exit.
    ///
    /// # Errors
    /// Returns an error if the shutdown request fails.
    pub fn shutdown(&mut self) -> Result<(), LspClientError> {
        let _: Option<Value> = self.request("shutdown", None)?;
        self.notify("exit", None)?;
        self.initialised = false;
        if let Some(mut child) = self.child.take() {
            child.wait().map_err(LspClientError::Io)?;
        }
        Ok(())
    }

    const fn require_initialised(&self) -> Result<(), LspClientError> {
        if self.initialised {
            Ok(())
        } else {
            Err(LspClientError::NotInitialised)
        }
    }

    fn call_hierarchy_request<R: DeserializeOwned>(
        &mut self,
        method: &str,
        params: &impl Serialize,
    ) -> Result<R, LspClientError> {
        self.require_initialised()?;
        self.request(method, Some(to_value(params)?))
    }

    fn request<R: DeserializeOwned>(
        &mut self,
        method: &str,
        params: Option<Value>,
    ) -> Result<R, LspClientError> {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);

        let request = Request {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };
        trace!(target: LOG_TARGET, id, method, "sending request");
        self.send(&request)?;

        for _ in 0..MAX_RESPONSE_ITERATIONS {
            let response = read_message(&mut self.reader)?;
            if !response.answers(id) {
                continue;
            }

            if let Some(error) = response.error {
                warn!(
                    target: LOG_TARGET,
                    id,
                    method,
                    code = error.code,
                    "server returned an error"
                );
                return Err(LspClientError::ServerError {
                    code: error.code,
                    message: error.message,
                });
            }
            let result = response.result.unwrap_or(Value::Null);
            return serde_json::from_value(result).map_err(LspClientError::Json);
        }

        Err(LspClientError::ResponseTimeout(id))
    }

    fn notify(&mut self, method: &str, params: Option<Value>) -> Result<(), LspClientError> {
        let notification = Notification {
            jsonrpc: "2.0",
            method,
            params,
        };
        trace!(target: LOG_TARGET, method, "sending notification");
        self.send(&notification)
    }

    fn send(&mut self, message: &impl Serialize) -> Result<(), LspClientError> {
        let content = serde_json::to_string(message).map_err(LspClientError::Json)?;
        write_message(&mut self.writer, &content)
    }
}

impl Drop for LspClient {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take()
            && let Err(error) = child.kill()
        {
            debug!(target: LOG_TARGET, %error, "language server already exited");
        }
    }
}

impl CallHierarchyClient for LspClient {
    fn prepare_call_hierarchy(
        &mut self,
        params: CallHierarchyPrepareParams,
    ) -> Result<Option<Vec<CallHierarchyItem>>, ModelError> {
        Ok(self.call_hierarchy_request("textDocument/prepareCallHierarchy", &params)?)
    }

    fn incoming_calls(
        &mut self,
        params: CallHierarchyIncomingCallsParams,
    ) -> Result<Option<Vec<CallHierarchyIncomingCall>>, ModelError> {
        Ok(self.call_hierarchy_request("callHierarchy/incomingCalls", &params)?)
    }

    fn outgoing_calls(
        &mut self,
        params: CallHierarchyOutgoingCallsParams,
    ) -> Result<Option<Vec<CallHierarchyOutgoingCall>>, ModelError> {
        Ok(self.call_hierarchy_request("callHierarchy/outgoingCalls", &params)?)
    }
}

fn to_value(params: &impl Serialize) -> Result<Value, LspClientError> {
    serde_json::to_value(params).map_err(LspClientError::Json)
}

/// Returns client capabilities for call hierarchy support.
fn client_capabilities() -> ClientCapabilities {
    ClientCapabilities {
        text_document: Some(TextDocumentClientCapabilities {
            call_hierarchy: Some(CallHierarchyClientCapabilities {
                dynamic_registration: Some(false),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}
