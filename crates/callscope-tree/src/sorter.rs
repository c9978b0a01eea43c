//! Sibling ordering for the call hierarchy tree.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::call::Call;
use crate::host::TreeSorter;

/// Orders siblings with [`Call::compare`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CallSorter;

impl TreeSorter<Call> for CallSorter {
    fn compare(&self, a: &Call, b: &Call) -> Ordering {
        Call::compare(a, b)
    }
}

impl TreeSorter<Arc<Call>> for CallSorter {
    fn compare(&self, a: &Arc<Call>, b: &Arc<Call>) -> Ordering {
        Call::compare(a, b)
    }
}
