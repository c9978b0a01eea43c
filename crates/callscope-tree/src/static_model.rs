//! A call hierarchy model backed by a fixed call graph.
//!
//! The graph is described in JSON: named items, the keys of the root items,
//! and caller/callee pairs with the call-site ranges inside the caller.
//!
//! ```json
//! {
//!   "items": { "main": { "name": "main", "kind": 12, "uri": "file:///src/main.rs",
//!                        "range": { ... }, "selectionRange": { ... } } },
//!   "roots": ["main"],
//!   "calls": [{ "caller": "main", "callee": "helper", "fromRanges": [ ... ] }]
//! }
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use camino::Utf8Path;
use lsp_types::{CallHierarchyIncomingCall, CallHierarchyItem, CallHierarchyOutgoingCall, Range};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::ModelError;
use crate::model::CallHierarchyModel;

/// Serialized form of a call graph.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallGraphFixture {
    /// Items keyed by a fixture-local name.
    pub items: BTreeMap<String, CallHierarchyItem>,
    /// Keys of the items the session starts from.
    pub roots: Vec<String>,
    /// Call edges between items.
    #[serde(default)]
    pub calls: Vec<FixtureCall>,
}

/// One call edge in a [`CallGraphFixture`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureCall {
    /// Key of the calling item.
    pub caller: String,
    /// Key of the called item.
    pub callee: String,
    /// Call sites, as ranges in the caller's document.
    #[serde(default)]
    pub from_ranges: Vec<Range>,
}

#[derive(Debug, Clone)]
struct Edge {
    caller: CallHierarchyItem,
    callee: CallHierarchyItem,
    from_ranges: Vec<Range>,
}

/// Call hierarchy model answering from an in-memory call graph.
#[derive(Debug, Clone)]
pub struct StaticCallHierarchyModel {
    roots: Vec<CallHierarchyItem>,
    edges: Vec<Edge>,
}

impl StaticCallHierarchyModel {
    /// Builds a model from a fixture, resolving every key.
    ///
    /// # Errors
    /// Returns `ModelError::Fixture` when a root or call names an unknown item.
    pub fn from_fixture(fixture: CallGraphFixture) -> Result<Self, ModelError> {
        let CallGraphFixture {
            items,
            roots: root_keys,
            calls,
        } = fixture;
        let lookup = |key: &str| {
            items
                .get(key)
                .cloned()
                .ok_or_else(|| ModelError::fixture(format!("unknown item '{key}'")))
        };

        let roots = root_keys
            .iter()
            .map(|key| lookup(key))
            .collect::<Result<Vec<_>, _>>()?;
        let edges = calls
            .into_iter()
            .map(|call| {
                Ok::<_, ModelError>(Edge {
                    caller: lookup(&call.caller)?,
                    callee: lookup(&call.callee)?,
                    from_ranges: call.from_ranges,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { roots, edges })
    }

    /// Parses a fixture from JSON text.
    ///
    /// # Errors
    /// Returns `ModelError::Fixture` if the JSON is malformed or inconsistent.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let fixture: CallGraphFixture =
            serde_json::from_str(json).map_err(|error| ModelError::fixture(error.to_string()))?;
        Self::from_fixture(fixture)
    }

    /// Reads and parses a fixture file.
    ///
    /// # Errors
    /// Returns `ModelError::Io` if the file cannot be read, or
    /// `ModelError::Fixture` if its contents are invalid.
    pub fn load(path: &Utf8Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path)
            .map_err(|error| ModelError::io(format!("failed to read {path}"), error))?;
        Self::from_json_str(&json)
    }
}

fn ensure_active(token: &CancellationToken) -> Result<(), ModelError> {
    if token.is_cancelled() {
        return Err(ModelError::Cancelled);
    }
    Ok(())
}

/// Items are the same symbol when their URI and range match.
fn same_item(left: &CallHierarchyItem, right: &CallHierarchyItem) -> bool {
    left.uri == right.uri && left.range == right.range
}

#[async_trait]
impl CallHierarchyModel for StaticCallHierarchyModel {
    fn roots(&self) -> &[CallHierarchyItem] {
        &self.roots
    }

    async fn resolve_outgoing_calls(
        &self,
        item: &CallHierarchyItem,
        token: &CancellationToken,
    ) -> Result<Vec<CallHierarchyOutgoingCall>, ModelError> {
        ensure_active(token)?;
        Ok(self
            .edges
            .iter()
            .filter(|edge| same_item(&edge.caller, item))
            .map(|edge| CallHierarchyOutgoingCall {
                to: edge.callee.clone(),
                from_ranges: edge.from_ranges.clone(),
            })
            .collect())
    }

    async fn resolve_incoming_calls(
        &self,
        item: &CallHierarchyItem,
        token: &CancellationToken,
    ) -> Result<Vec<CallHierarchyIncomingCall>, ModelError> {
        ensure_active(token)?;
        Ok(self
            .edges
            .iter()
            .filter(|edge| same_item(&edge.callee, item))
            .map(|edge| CallHierarchyIncomingCall {
                from: edge.caller.clone(),
                from_ranges: edge.from_ranges.clone(),
            })
            .collect())
    }
}
