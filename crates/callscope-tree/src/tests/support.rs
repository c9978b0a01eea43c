//! Shared test helpers for call hierarchy test cases.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lsp_types::{
    CallHierarchyIncomingCall, CallHierarchyItem, CallHierarchyOutgoingCall, Position, Range,
    SymbolKind, Uri,
};
use tokio_util::sync::CancellationToken;

use crate::{Call, CallHierarchyModel, ModelError};

pub(super) fn uri(path: &str) -> Uri {
    Uri::from_str(&format!("file://{path}")).expect("valid URI")
}

pub(super) fn range(line: u32, column: u32) -> Range {
    Range {
        start: Position::new(line, column),
        end: Position::new(line, column + 1),
    }
}

pub(super) fn item_in(path: &str, name: &str, line: u32, column: u32) -> CallHierarchyItem {
    CallHierarchyItem {
        name: name.to_owned(),
        kind: SymbolKind::FUNCTION,
        tags: None,
        detail: None,
        uri: uri(path),
        range: range(line, column),
        selection_range: range(line, column),
        data: None,
    }
}

pub(super) fn item(name: &str, line: u32, column: u32) -> CallHierarchyItem {
    item_in("/src/main.rs", name, line, column)
}

pub(super) fn outgoing(
    to: CallHierarchyItem,
    from_ranges: Vec<Range>,
) -> CallHierarchyOutgoingCall {
    CallHierarchyOutgoingCall { to, from_ranges }
}

pub(super) fn incoming(
    from: CallHierarchyItem,
    from_ranges: Vec<Range>,
) -> CallHierarchyIncomingCall {
    CallHierarchyIncomingCall { from, from_ranges }
}

/// Model answering from scripted per-item responses and counting requests.
#[derive(Debug, Default)]
pub(super) struct ScriptedModel {
    roots: Vec<CallHierarchyItem>,
    outgoing: Vec<(CallHierarchyItem, Vec<CallHierarchyOutgoingCall>)>,
    incoming: Vec<(CallHierarchyItem, Vec<CallHierarchyIncomingCall>)>,
    failing: bool,
    outgoing_requests: AtomicUsize,
    incoming_requests: AtomicUsize,
}

impl ScriptedModel {
    pub(super) fn with_roots(roots: Vec<CallHierarchyItem>) -> Self {
        Self {
            roots,
            ..Self::default()
        }
    }

    pub(super) fn outgoing_from(
        mut self,
        caller: &CallHierarchyItem,
        calls: Vec<CallHierarchyOutgoingCall>,
    ) -> Self {
        self.outgoing.push((caller.clone(), calls));
        self
    }

    pub(super) fn incoming_to(
        mut self,
        callee: &CallHierarchyItem,
        calls: Vec<CallHierarchyIncomingCall>,
    ) -> Self {
        self.incoming.push((callee.clone(), calls));
        self
    }

    pub(super) fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub(super) fn outgoing_requests(&self) -> usize {
        self.outgoing_requests.load(Ordering::SeqCst)
    }

    pub(super) fn incoming_requests(&self) -> usize {
        self.incoming_requests.load(Ordering::SeqCst)
    }

    fn answer<T: Clone>(
        &self,
        script: &[(CallHierarchyItem, Vec<T>)],
        item: &CallHierarchyItem,
    ) -> Result<Vec<T>, ModelError> {
        if self.failing {
            return Err(ModelError::provider(
                "scripted failure",
                std::io::Error::other("symbol no longer resolvable"),
            ));
        }
        Ok(script
            .iter()
            .find(|(key, _)| key.uri == item.uri && key.range == item.range)
            .map(|(_, calls)| calls.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl CallHierarchyModel for ScriptedModel {
    fn roots(&self) -> &[CallHierarchyItem] {
        &self.roots
    }

    async fn resolve_outgoing_calls(
        &self,
        item: &CallHierarchyItem,
        _token: &CancellationToken,
    ) -> Result<Vec<CallHierarchyOutgoingCall>, ModelError> {
        self.outgoing_requests.fetch_add(1, Ordering::SeqCst);
        self.answer(&self.outgoing, item)
    }

    async fn resolve_incoming_calls(
        &self,
        item: &CallHierarchyItem,
        _token: &CancellationToken,
    ) -> Result<Vec<CallHierarchyIncomingCall>, ModelError> {
        self.incoming_requests.fetch_add(1, Ordering::SeqCst);
        self.answer(&self.incoming, item)
    }
}

/// Builds a parent chain from `items`, first item as the root.
pub(super) fn chain(model: &Arc<ScriptedModel>, items: &[CallHierarchyItem]) -> Arc<Call> {
    let shared: Arc<dyn CallHierarchyModel> = Arc::clone(model) as Arc<dyn CallHierarchyModel>;
    let (first, rest) = items.split_first().expect("chain needs at least one item");
    let mut node = Arc::new(Call::root(first.clone(), shared));
    for (index, next) in rest.iter().enumerate() {
        let site = range(u32::try_from(index).expect("small index"), 0);
        let location = lsp_types::Location::new(node.item().uri.clone(), site);
        node = Arc::new(Call::child(next.clone(), vec![location], node));
    }
    node
}
