//! Unit tests for the language server client.

#![expect(clippy::expect_used, reason = "tests require contextual panics")]

use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use callscope_tree::{CallHierarchyClient, ModelError};
use lsp_types::{
    CallHierarchyPrepareParams, PartialResultParams, Position, TextDocumentIdentifier,
    TextDocumentPositionParams, Uri, WorkDoneProgressParams,
};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use crate::jsonrpc::read_message;
use crate::{LspClient, LspClientError, MAX_RESPONSE_ITERATIONS};


/// Frames a JSON value the way a server would.
fn frame(message: &Value) -> Vec<u8> {
    let body = message.to_string();
    let mut bytes = format!("Content-Length: {}\r\n\r\n", body.len()).into_bytes();
    bytes.extend_from_slice(body.as_bytes());
    bytes
}

fn transcript(messages: &[Value]) -> Cursor<Vec<u8>> {
    Cursor::new(messages.iter().flat_map(frame).collect())
}

fn reply(id: i64, result: &Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

fn log_message() -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "window/logMessage",
        "params": { "type": 3, "message": "indexing" }
    })
}

/// Captures everything the client writes.
#[derive(Clone, Default)]
struct Sent(Arc<Mutex<Vec<u8>>>);

impl Write for Sent {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0
            .lock()
            .map_err(|_| std::io::Error::other("poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Sent {
    fn methods(&self) -> Vec<String> {
        let bytes = self.0.lock().expect("sent buffer poisoned").clone();
        let mut reader = Cursor::new(bytes);
        let mut methods = Vec::new();
        while reader.position() < reader.get_ref().len() as u64 {
            let message = read_message(&mut reader).expect("client wrote a framed message");
            methods.push(message.method.expect("client messages carry a method"));
        }
        methods
    }
}

#[fixture]
fn document() -> Uri {
    "file:///src/main.rs".parse().expect("valid URI")
}

fn prepare_params(uri: Uri) -> CallHierarchyPrepareParams {
    CallHierarchyPrepareParams {
        text_document_position_params: TextDocumentPositionParams {
            text_document: TextDocumentIdentifier { uri },
            position: Position::new(0, 3),
        },
        work_done_progress_params: WorkDoneProgressParams::default(),
    }
}

fn item_json() -> Value {
    json!({
        "name": "main",
        "kind": 12,
        "uri": "file:///src/main.rs",
        "range": { "start": { "line": 0, "character": 0 }, "end": { "line": 4, "character": 1 } },
        "selectionRange": { "start": { "line": 0, "character": 3 }, "end": { "line": 0, "character": 7 } }
    })
}

/// A client whose server answers `initialize` and then `responses`.
fn initialised_client(responses: &[Value]) -> (LspClient, Sent) {
    let mut messages = vec![reply(1, &json!({ "capabilities": {} }))];
    messages.extend_from_slice(responses);
    let sent = Sent::default();
    let mut client = LspClient::from_streams(transcript(&messages), sent.clone());
    client
        .initialize("file:///src".parse().expect("valid URI"))
        .expect("initialize");
    (client, sent)
}

#[rstest]
fn prepare_skips_notifications_and_unrelated_replies(document: Uri) {
    let (mut client, sent) = initialised_client(&[
        log_message(),
        reply(99, &json!(null)),
        reply(2, &json!([item_json()])),
    ]);

    let items = client
        .prepare_call_hierarchy(prepare_params(document))
        .expect("prepare")
        .expect("items");

    assert!(client.is_initialised());
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().map(|item| item.name.as_str()), Some("main"));
    assert_eq!(
        sent.methods(),
        ["initialize", "initialized", "textDocument/prepareCallHierarchy"]
    );
}

#[rstest]
fn null_results_are_none(document: Uri) {
    let (mut client, _) = initialised_client(&[reply(2, &json!(null))]);

    let items = client
        .prepare_call_hierarchy(prepare_params(document))
        .expect("prepare");

    assert!(items.is_none());
}

#[rstest]
fn requests_before_initialise_are_rejected(document: Uri) {
    let mut client = LspClient::from_streams(transcript(&[]), Sent::default());

    let err = client
        .prepare_call_hierarchy(prepare_params(document))
        .expect_err("expected rejection");

    let ModelError::Provider { source, .. } = err else {
        panic!("expected a provider error, got {err:?}");
    };
    assert!(matches!(
        source.downcast_ref::<LspClientError>(),
        Some(LspClientError::NotInitialised)
    ));
}

#[test]
fn server_errors_carry_code_and_message() {
    let (mut client, _) = initialised_client(&[json!({
        "jsonrpc": "2.0",
        "id": 2,
        "error": { "code": -32601, "message": "method not found" }
    })]);

    let err = client
        .outgoing_calls(lsp_types::CallHierarchyOutgoingCallsParams {
            item: serde_json::from_value(item_json()).expect("item"),
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        })
        .expect_err("expected server error");

    let ModelError::Provider { source, .. } = err else {
        panic!("expected a provider error, got {err:?}");
    };
    assert!(matches!(
        source.downcast_ref::<LspClientError>(),
        Some(LspClientError::ServerError { code: -32601, message }) if message == "method not found"
    ));
}

#[test]
fn endless_notifications_time_out() {
    let noise = vec![log_message(); MAX_RESPONSE_ITERATIONS];
    let (mut client, _) = initialised_client(&noise);

    let err = client
        .did_open(
            "file:///src/main.rs".parse().expect("valid URI"),
            "rust",
            "fn main() {}",
        )
        .and_then(|()| client.shutdown())
        .expect_err("expected timeout");

    assert!(matches!(err, LspClientError::ResponseTimeout(2)));
}

#[test]
fn shutdown_sends_exit() {
    let (mut client, sent) = initialised_client(&[reply(2, &json!(null))]);

    client.shutdown().expect("shutdown");

    assert!(!client.is_initialised());
    assert_eq!(
        sent.methods(),
        ["initialize", "initialized", "shutdown", "exit"]
    );
}
