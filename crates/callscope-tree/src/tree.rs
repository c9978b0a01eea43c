//! A minimal tree host that expands the hierarchy to a fixed depth.

use std::sync::Arc;

use lsp_types::Location;
use serde::Serialize;
use tracing::debug;

use crate::call::Call;
use crate::data_source::{CallDataSource, ChildrenRequest};
use crate::error::ModelError;
use crate::host::{AccessibilityProvider, TreeIdentityProvider, TreeRenderer, TreeSorter};
use crate::identity::{CallId, CallIdentityProvider};
use crate::render::{CallAccessibilityProvider, CallRenderer, RenderedCall};
use crate::sorter::CallSorter;
use crate::uri::display_location;

/// One visible row of an expanded tree.
#[derive(Debug, Clone, Serialize)]
pub struct TreeRow {
    /// Distance from the roots; roots are at depth 0.
    pub depth: usize,
    /// Identity of the node.
    pub id: CallId,
    /// Rendered label.
    pub label: RenderedCall,
    /// Screen reader label.
    pub aria_label: String,
    /// Call sites linking the node to its parent; `None` for roots.
    pub locations: Option<Vec<Location>>,
}

/// Drives a [`CallDataSource`] and the presentation capabilities the way a
/// tree view would, producing a flat list of rows in display order.
pub struct CallTree {
    data_source: CallDataSource,
    sorter: CallSorter,
    identity: CallIdentityProvider,
    renderer: CallRenderer,
    accessibility: CallAccessibilityProvider,
}

impl CallTree {
    /// Creates a host over `data_source`, sharing its session.
    #[must_use]
    pub fn new(data_source: CallDataSource) -> Self {
        let session = Arc::clone(data_source.session());
        Self {
            data_source,
            sorter: CallSorter,
            identity: CallIdentityProvider::new(Arc::clone(&session)),
            renderer: CallRenderer,
            accessibility: CallAccessibilityProvider::new(session),
        }
    }

    /// Returns the label of the tree widget.
    #[must_use]
    pub fn widget_label(&self) -> String {
        self.accessibility.widget_aria_label()
    }

    /// Expands every node above `max_depth` and returns the rows depth-first.
    ///
    /// With `max_depth` 0 only the roots are listed.
    ///
    /// # Errors
    /// Returns the first model error encountered, unchanged.
    pub async fn expand(&self, max_depth: usize) -> Result<Vec<TreeRow>, ModelError> {
        let mut rows = Vec::new();
        let mut pending = self.sorted_children(&ChildrenRequest::Root).await?;
        pending.reverse();

        while let Some(call) = pending.pop() {
            let depth = call.depth();
            rows.push(self.row(&call, depth));

            let request = ChildrenRequest::Node(Arc::clone(&call));
            if depth < max_depth && self.data_source.has_children(&request) {
                let mut children = self.sorted_children(&request).await?;
                children.reverse();
                pending.extend(children);
            }
        }

        debug!(target: "callscope::tree", rows = rows.len(), max_depth, "expanded tree");
        Ok(rows)
    }

    async fn sorted_children(
        &self,
        request: &ChildrenRequest,
    ) -> Result<Vec<Arc<Call>>, ModelError> {
        let mut children = self.data_source.get_children(request).await?;
        children.sort_by(|a, b| self.sorter.compare(a, b));
        Ok(children)
    }

    fn row(&self, call: &Call, depth: usize) -> TreeRow {
        TreeRow {
            depth,
            id: self.identity.get_id(call),
            label: self.renderer.render(call),
            aria_label: self.accessibility.aria_label(call),
            locations: call.locations().map(<[Location]>::to_vec),
        }
    }
}

/// Renders rows as an indented outline, two spaces per level.
///
/// Each line shows the name, the description in parentheses and the first
/// call site; further call sites are summarised as `+N`.
#[must_use]
pub fn render_text(rows: &[TreeRow]) -> String {
    let mut text = String::new();
    for row in rows {
        text.push_str(&"  ".repeat(row.depth));
        text.push_str(&row.label.name);
        if row.label.deprecated {
            text.push_str(" [deprecated]");
        }
        if let Some(description) = &row.label.description {
            text.push_str(&format!(" ({description})"));
        }
        if let Some((first, rest)) = row
            .locations
            .as_deref()
            .and_then(<[Location]>::split_first)
        {
            text.push_str(&format!(" @ {}", display_location(first)));
            if !rest.is_empty() {
                text.push_str(&format!(" +{}", rest.len()));
            }
        }
        text.push('\n');
    }
    text
}
