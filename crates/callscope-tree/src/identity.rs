//! Stable identities for call hierarchy nodes.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::call::Call;
use crate::host::TreeIdentityProvider;
use crate::session::SessionContext;

/// Identity of a node as seen by the tree host.
///
/// The key covers the whole ancestor chain and the direction the tree was
/// built in. Each level is written as `{direction}|{uri}|{start}-{end}` with
/// the URI JSON-quoted, and levels are joined with `/` from the node up to
/// its root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Returns the string representation of this identity.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives [`CallId`]s so the host can diff refreshed trees and keep
/// expansion and selection state.
#[derive(Debug, Clone)]
pub struct CallIdentityProvider {
    session: Arc<SessionContext>,
}

impl CallIdentityProvider {
    /// Creates an identity provider reading the direction from `session`.
    #[must_use]
    pub const fn new(session: Arc<SessionContext>) -> Self {
        Self { session }
    }
}

impl TreeIdentityProvider<Call> for CallIdentityProvider {
    type Id = CallId;

    /// Computes the identity of `call`. Costs O(depth).
    fn get_id(&self, call: &Call) -> CallId {
        let tag = self.session.direction().tag();
        let mut id = String::new();
        for (index, level) in call.ancestors().enumerate() {
            if index > 0 {
                id.push('/');
            }
            let item = level.item();
            let uri = serde_json::Value::from(item.uri.as_str());
            let (start, end) = (item.range.start, item.range.end);
            id.push_str(&format!(
                "{tag}|{uri}|{}:{}-{}:{}",
                start.line, start.character, end.line, end.character
            ));
        }
        CallId(id)
    }
}
