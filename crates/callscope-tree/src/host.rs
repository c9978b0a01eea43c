//! Contracts a generic tree view host consumes.
//!
//! The host owns layout, scrolling and diffing. It asks these capabilities
//! how to order siblings, how to key nodes across refreshes, and how to
//! present them.

use std::cmp::Ordering;

use async_trait::async_trait;

/// Supplies children on demand.
///
/// `P` is what the host asks about: its invisible root or an element it has
/// already shown.
#[async_trait]
pub trait TreeDataSource<P: Sync>: Sync {
    /// Elements produced for the host.
    type Element: Send;
    /// Failure reported by [`TreeDataSource::get_children`].
    type Error: Send;

    /// Reports whether `parent` may have children, before loading them.
    fn has_children(&self, parent: &P) -> bool;

    /// Loads the children of `parent`.
    ///
    /// # Errors
    /// Returns the source's error when loading fails.
    async fn get_children(&self, parent: &P) -> Result<Vec<Self::Element>, Self::Error>;
}

/// Orders sibling elements.
pub trait TreeSorter<T> {
    /// Three-way comparison of two siblings.
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// Keys elements so refreshed trees can be reconciled.
pub trait TreeIdentityProvider<T> {
    /// Key type used for diffing and persisted expansion state.
    type Id: Eq + std::hash::Hash;

    /// Returns the key for `element`.
    fn get_id(&self, element: &T) -> Self::Id;
}

/// Turns an element into its row content.
pub trait TreeRenderer<T> {
    /// Rendered row content.
    type Output;

    /// Identifies the row template this renderer fills.
    fn template_id(&self) -> &'static str;

    /// Renders `element`.
    fn render(&self, element: &T) -> Self::Output;
}

/// Row geometry for a virtualized list.
pub trait VirtualDelegate<T> {
    /// Row height in pixels.
    fn height(&self, element: &T) -> u32;

    /// Template used to render `element`.
    fn template_id(&self, element: &T) -> &'static str;
}

/// Screen reader labels.
pub trait AccessibilityProvider<T> {
    /// Label announced for `element`.
    fn aria_label(&self, element: &T) -> String;

    /// Label announced for the tree widget itself.
    fn widget_aria_label(&self) -> String;
}
