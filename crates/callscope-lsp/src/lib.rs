//! Language server client for the callscope explorer.
//!
//! [`LspClient`] spawns a server process and speaks LSP JSON-RPC over its
//! stdin and stdout. It implements [`callscope_tree::CallHierarchyClient`], so
//! a running server can back an [`callscope_tree::LspCallHierarchyModel`].

mod client;
mod error;
mod jsonrpc;

pub use client::{LspClient, MAX_RESPONSE_ITERATIONS};
pub use error::LspClientError;
pub use jsonrpc::MAX_MESSAGE_BYTES;

#[cfg(test)]
mod tests;
