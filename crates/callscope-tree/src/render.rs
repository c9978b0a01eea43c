//! Presentation of call hierarchy nodes.
//!
//! Everything here is a pure function of a [`Call`] (and, for accessibility
//! labels, the session direction).

use std::sync::Arc;

use lsp_types::SymbolTag;
use serde::Serialize;

use crate::call::Call;
use crate::host::{AccessibilityProvider, TreeRenderer, VirtualDelegate};
use crate::session::{Direction, SessionContext};

/// Template filled by [`CallRenderer`].
pub const CALL_TEMPLATE_ID: &str = "CallRenderer";

/// Fixed row height of the call hierarchy tree, in pixels.
pub const CALL_ROW_HEIGHT: u32 = 22;

/// Kind of callable symbol.
///
/// This mirrors LSP's `SymbolKind` but only includes callable symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    /// A function definition.
    Function,
    /// A method on a class or struct.
    Method,
    /// A class constructor.
    Constructor,
    /// A property getter or setter (when callable).
    Property,
    /// Unknown or unclassified callable.
    Unknown,
}

impl SymbolKind {
    /// Converts from LSP `SymbolKind` to our domain type.
    #[must_use]
    pub const fn from_lsp(kind: lsp_types::SymbolKind) -> Self {
        match kind {
            lsp_types::SymbolKind::FUNCTION => Self::Function,
            lsp_types::SymbolKind::METHOD => Self::Method,
            lsp_types::SymbolKind::CONSTRUCTOR => Self::Constructor,
            lsp_types::SymbolKind::PROPERTY => Self::Property,
            _ => Self::Unknown,
        }
    }
}

/// Row content for one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedCall {
    /// Symbol name.
    pub name: String,
    /// Secondary text, usually the container or signature.
    pub description: Option<String>,
    /// Kind of callable.
    pub kind: SymbolKind,
    /// Whether the provider tagged the symbol as deprecated.
    pub deprecated: bool,
}

/// Renders a node's label from its item.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallRenderer;

impl TreeRenderer<Call> for CallRenderer {
    type Output = RenderedCall;

    fn template_id(&self) -> &'static str {
        CALL_TEMPLATE_ID
    }

    fn render(&self, call: &Call) -> RenderedCall {
        let item = call.item();
        let deprecated = item
            .tags
            .as_ref()
            .is_some_and(|tags| tags.contains(&SymbolTag::DEPRECATED));
        RenderedCall {
            name: item.name.clone(),
            description: item.detail.clone(),
            kind: SymbolKind::from_lsp(item.kind),
            deprecated,
        }
    }
}

/// Fixed-height rows, all rendered by [`CallRenderer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CallVirtualDelegate;

impl VirtualDelegate<Call> for CallVirtualDelegate {
    fn height(&self, _call: &Call) -> u32 {
        CALL_ROW_HEIGHT
    }

    fn template_id(&self, _call: &Call) -> &'static str {
        CALL_TEMPLATE_ID
    }
}

/// Screen reader labels that follow the session direction.
#[derive(Debug, Clone)]
pub struct CallAccessibilityProvider {
    session: Arc<SessionContext>,
}

impl CallAccessibilityProvider {
    /// Creates a provider reading the direction from `session`.
    #[must_use]
    pub const fn new(session: Arc<SessionContext>) -> Self {
        Self { session }
    }
}

impl AccessibilityProvider<Call> for CallAccessibilityProvider {
    fn aria_label(&self, call: &Call) -> String {
        let name = &call.item().name;
        match self.session.direction() {
            Direction::CallsFrom => format!("calls from {name}"),
            Direction::CallsTo => format!("callers of {name}"),
        }
    }

    fn widget_aria_label(&self) -> String {
        String::from("Call Hierarchy")
    }
}
