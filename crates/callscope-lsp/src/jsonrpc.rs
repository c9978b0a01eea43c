//! JSON-RPC message types and `Content-Length` framing.
//!
//! Language servers exchange JSON-RPC 2.0 messages over stdio, each prefixed
//! by a header block that ends with an empty line. Only `Content-Length` is
//! interpreted; other headers are ignored.

use std::io::{BufRead, ErrorKind, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::LspClientError;

/// Largest message body accepted from a server, in bytes.
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

/// JSON-RPC request structure.
#[derive(Debug, Serialize)]
pub(crate) struct Request<'a> {
    pub jsonrpc: &'static str,
    pub id: i64,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// JSON-RPC notification structure.
#[derive(Debug, Serialize)]
pub(crate) struct Notification<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// Any message read from the server.
///
/// Notifications and server-to-client requests carry a `method`; responses
/// carry an `id` together with `result` or `error`.
#[derive(Debug, Deserialize)]
pub(crate) struct Response {
    pub id: Option<Value>,
    pub method: Option<String>,
    pub result: Option<Value>,
    pub error: Option<ResponseError>,
}

impl Response {
    /// Returns true when this message answers the request with `id`.
    pub(crate) fn answers(&self, id: i64) -> bool {
        self.method.is_none() && self.id.as_ref().and_then(Value::as_i64) == Some(id)
    }
}

/// JSON-RPC error structure.
#[derive(Debug, Deserialize)]
pub(crate) struct ResponseError {
    pub code: i64,
    pub message: String,
}

/// Writes one framed message.
pub(crate) fn write_message(writer: &mut impl Write, content: &str) -> Result<(), LspClientError> {
    let header = format!("Content-Length: {}\r\n\r\n", content.len());
    writer
        .write_all(header.as_bytes())
        .map_err(LspClientError::Io)?;
    writer
        .write_all(content.as_bytes())
        .map_err(LspClientError::Io)?;
    writer.flush().map_err(LspClientError::Io)
}

/// Reads one framed message.
pub(crate) fn read_message(reader: &mut impl BufRead) -> Result<Response, LspClientError> {
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line).map_err(LspClientError::Io)?;
        if read == 0 {
            return Err(LspClientError::protocol(
                ErrorKind::UnexpectedEof,
                "language server closed its output",
            ));
        }

        let header = line.trim();
        if header.is_empty() {
            break;
        }
        if let Some((name, value)) = header.split_once(':')
            && name.trim().eq_ignore_ascii_case("content-length")
        {
            let raw = value.trim();
            let parsed = raw.parse::<usize>().map_err(|source| {
                LspClientError::protocol(
                    ErrorKind::InvalidData,
                    format!("invalid Content-Length header '{raw}': {source}"),
                )
            })?;
            content_length = Some(parsed);
        }
    }

    let len = content_length.ok_or_else(|| {
        LspClientError::protocol(ErrorKind::InvalidData, "missing Content-Length header")
    })?;
    if len > MAX_MESSAGE_BYTES {
        return Err(LspClientError::protocol(
            ErrorKind::InvalidData,
            format!("message of {len} bytes exceeds size limit of {MAX_MESSAGE_BYTES}"),
        ));
    }

    let mut buffer = vec![0_u8; len];
    reader.read_exact(&mut buffer).map_err(LspClientError::Io)?;
    serde_json::from_slice(&buffer).map_err(LspClientError::Json)
}
