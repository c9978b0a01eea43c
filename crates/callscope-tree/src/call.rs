//! Call hierarchy tree nodes.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use lsp_types::{CallHierarchyItem, Location};

use crate::model::CallHierarchyModel;

/// Where a non-root node came from: the node that was expanded and the call
/// sites that link the two.
struct CallOrigin {
    locations: Vec<Location>,
    parent: Arc<Call>,
}

/// A node in the call hierarchy tree.
///
/// Nodes are immutable. Expanding a node always yields fresh children, even
/// when the same item already appears higher up the parent chain, so a cyclic
/// call graph unfolds into an unbounded tree whose depth is bounded only by
/// how far the host expands it.
pub struct Call {
    item: CallHierarchyItem,
    model: Arc<dyn CallHierarchyModel>,
    origin: Option<CallOrigin>,
}

impl Call {
    /// Creates a root node for one of the model's starting items.
    #[must_use]
    pub const fn root(item: CallHierarchyItem, model: Arc<dyn CallHierarchyModel>) -> Self {
        Self {
            item,
            model,
            origin: None,
        }
    }

    /// Creates a node discovered by expanding `parent`.
    ///
    /// `locations` are the call sites linking the parent and this node. The
    /// node shares the parent's model.
    #[must_use]
    pub fn child(item: CallHierarchyItem, locations: Vec<Location>, parent: Arc<Self>) -> Self {
        Self {
            item,
            model: Arc::clone(&parent.model),
            origin: Some(CallOrigin { locations, parent }),
        }
    }

    /// Returns the call hierarchy item this node represents.
    #[must_use]
    pub const fn item(&self) -> &CallHierarchyItem {
        &self.item
    }

    /// Returns the call sites for this node, or `None` for a root.
    #[must_use]
    pub fn locations(&self) -> Option<&[Location]> {
        self.origin
            .as_ref()
            .map(|origin| origin.locations.as_slice())
    }

    /// Returns the node this one was expanded from, or `None` for a root.
    #[must_use]
    pub fn parent(&self) -> Option<&Arc<Self>> {
        self.origin.as_ref().map(|origin| &origin.parent)
    }

    /// Returns the model shared by every node of the tree.
    #[must_use]
    pub const fn model(&self) -> &Arc<dyn CallHierarchyModel> {
        &self.model
    }

    /// Returns whether this node is one of the session's starting items.
    #[must_use]
    pub const fn is_root(&self) -> bool {
        self.origin.is_none()
    }

    /// Returns the number of ancestors above this node.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestors().count().saturating_sub(1)
    }

    /// Iterates from this node up to its root, inclusive.
    #[must_use]
    pub const fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// Orders two nodes by item URI, then by the start of the item range.
    ///
    /// Only the node's own item takes part; locations and parents are ignored
    /// so siblings sort the same way however they were reached.
    #[must_use]
    pub fn compare(a: &Self, b: &Self) -> Ordering {
        let (left, right) = (&a.item, &b.item);
        left.uri
            .as_str()
            .cmp(right.uri.as_str())
            .then_with(|| left.range.start.line.cmp(&right.range.start.line))
            .then_with(|| {
                left.range
                    .start
                    .character
                    .cmp(&right.range.start.character)
            })
    }
}

impl fmt::Debug for Call {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Call")
            .field("item", &self.item.name)
            .field("uri", &self.item.uri.as_str())
            .field("locations", &self.locations())
            .field("parent", &self.parent().map(|parent| &parent.item.name))
            .finish_non_exhaustive()
    }
}

/// Iterator over a node and its ancestors, nearest first.
#[derive(Debug)]
pub struct Ancestors<'a> {
    next: Option<&'a Call>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Call;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent().map(AsRef::as_ref);
        Some(current)
    }
}
