//! Pull-based children resolution for the call hierarchy tree.

use std::sync::Arc;

use async_trait::async_trait;
use lsp_types::Location;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::call::Call;
use crate::error::ModelError;
use crate::host::TreeDataSource;
use crate::model::CallHierarchyModel;
use crate::session::{Direction, SessionContext};

/// The element a tree host asks children for.
#[derive(Debug, Clone)]
pub enum ChildrenRequest {
    /// The invisible root container; its children are the session roots.
    Root,
    /// An expanded node.
    Node(Arc<Call>),
}

/// Bridges the model's async call queries to the tree host's children
/// protocol.
pub struct CallDataSource {
    model: Arc<dyn CallHierarchyModel>,
    session: Arc<SessionContext>,
}

impl CallDataSource {
    /// Creates a data source over `model`, following the direction held by
    /// `session`.
    #[must_use]
    pub const fn new(model: Arc<dyn CallHierarchyModel>, session: Arc<SessionContext>) -> Self {
        Self { model, session }
    }

    /// Returns the session this data source reads its direction from.
    #[must_use]
    pub const fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Reports whether `request` may have children.
    ///
    /// Always `true`: the graph may be infinite or cyclic, so leaves are only
    /// discovered by loading an empty child set.
    #[must_use]
    pub const fn has_children(&self, _request: &ChildrenRequest) -> bool {
        true
    }

    /// Resolves one level of children for `request`.
    ///
    /// # Errors
    /// Returns the model's error unchanged if resolution fails.
    pub async fn get_children(
        &self,
        request: &ChildrenRequest,
    ) -> Result<Vec<Arc<Call>>, ModelError> {
        match request {
            ChildrenRequest::Root => Ok(self.root_calls()),
            ChildrenRequest::Node(call) => self.expand(call).await,
        }
    }

    fn root_calls(&self) -> Vec<Arc<Call>> {
        self.model
            .roots()
            .iter()
            .map(|item| Arc::new(Call::root(item.clone(), Arc::clone(&self.model))))
            .collect()
    }

    async fn expand(&self, call: &Arc<Call>) -> Result<Vec<Arc<Call>>, ModelError> {
        let direction = self.session.direction();
        let token = CancellationToken::new();
        let item = call.item();

        let children: Vec<Arc<Call>> = match direction {
            // Call sites of an outgoing call sit in the expanded item's file.
            Direction::CallsFrom => call
                .model()
                .resolve_outgoing_calls(item, &token)
                .await?
                .into_iter()
                .map(|outgoing| {
                    let locations = outgoing
                        .from_ranges
                        .into_iter()
                        .map(|range| Location::new(item.uri.clone(), range))
                        .collect();
                    Arc::new(Call::child(outgoing.to, locations, Arc::clone(call)))
                })
                .collect(),
            // Call sites of an incoming call sit in the discovered caller's file.
            Direction::CallsTo => call
                .model()
                .resolve_incoming_calls(item, &token)
                .await?
                .into_iter()
                .map(|incoming| {
                    let locations = incoming
                        .from_ranges
                        .into_iter()
                        .map(|range| Location::new(incoming.from.uri.clone(), range))
                        .collect();
                    Arc::new(Call::child(incoming.from, locations, Arc::clone(call)))
                })
                .collect(),
        };

        debug!(
            target: "callscope::data_source",
            direction = %direction,
            item = %item.name,
            children = children.len(),
            "expanded call"
        );
        Ok(children)
    }
}

#[async_trait]
impl TreeDataSource<ChildrenRequest> for CallDataSource {
    type Element = Arc<Call>;
    type Error = ModelError;

    fn has_children(&self, parent: &ChildrenRequest) -> bool {
        Self::has_children(self, parent)
    }

    async fn get_children(&self, parent: &ChildrenRequest) -> Result<Vec<Arc<Call>>, ModelError> {
        Self::get_children(self, parent).await
    }
}
