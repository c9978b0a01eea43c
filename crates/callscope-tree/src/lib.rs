//! Call hierarchy tree adapter for the callscope explorer.
//!
//! Given a starting symbol, the explorer lazily unfolds a tree of callers
//! ("who calls this") or callees ("what does this call"), every node carrying
//! the call sites that link it to its parent. This crate holds the pieces a
//! tree view needs to present that hierarchy correctly:
//!
//! - [`Call`] - an immutable node with an owning link to its parent
//! - [`CallDataSource`] - resolves one level of children, per direction
//! - [`CallIdentityProvider`] - keys nodes by their whole ancestor chain
//! - [`CallSorter`] - orders siblings by URI, then by range start
//!
//! The direction is session state held by [`SessionContext`] and read afresh
//! on every request. Call resolution itself belongs to a
//! [`CallHierarchyModel`]: [`LspCallHierarchyModel`] forwards to a language
//! server through a [`CallHierarchyClient`], and [`StaticCallHierarchyModel`]
//! answers from a JSON call graph.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use callscope_tree::{CallDataSource, CallTree, Direction, SessionContext};
//!
//! let session = Arc::new(SessionContext::new(Direction::CallsTo));
//! let data_source = CallDataSource::new(model, Arc::clone(&session));
//! let rows = CallTree::new(data_source).expand(2).await?;
//! print!("{}", callscope_tree::render_text(&rows));
//! ```

mod call;
mod data_source;
mod error;
mod host;
mod identity;
mod model;
mod render;
mod session;
mod sorter;
mod static_model;
mod tree;
mod uri;

pub use call::{Ancestors, Call};
pub use data_source::{CallDataSource, ChildrenRequest};
pub use error::{ModelError, ProviderSource};
pub use host::{
    AccessibilityProvider, TreeDataSource, TreeIdentityProvider, TreeRenderer, TreeSorter,
    VirtualDelegate,
};
pub use identity::{CallId, CallIdentityProvider};
pub use model::{CallHierarchyClient, CallHierarchyModel, LspCallHierarchyModel, SourcePosition};
pub use render::{
    CALL_ROW_HEIGHT, CALL_TEMPLATE_ID, CallAccessibilityProvider, CallRenderer,
    CallVirtualDelegate, RenderedCall, SymbolKind,
};
pub use session::{Direction, SessionContext};
pub use sorter::CallSorter;
pub use static_model::{CallGraphFixture, FixtureCall, StaticCallHierarchyModel};
pub use tree::{CallTree, TreeRow, render_text};
pub use uri::{display_location, path_to_uri, uri_to_path};
