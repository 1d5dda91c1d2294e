//! Single-slot memoization keyed by input identity.

use crate::column::ColumnRef;
use crate::state::{FilterState, SortState, VisibleColumns};

/// Inputs that determine a table view.
///
/// Set-valued inputs compare by pointer identity, scalar inputs by value.
#[derive(Debug, Clone)]
pub struct ViewKey<K: ColumnRef> {
    pub generation: u64,
    pub filters: FilterState<K>,
    pub query: String,
    pub sort: SortState<K>,
    pub visible: VisibleColumns<K>,
}

/// Keys that can be checked for "same inputs".
pub trait MemoKey {
    fn same_as(&self, other: &Self) -> bool;
}

impl<K: ColumnRef> MemoKey for ViewKey<K> {
    fn same_as(&self, other: &Self) -> bool {
        self.generation == other.generation
            && self.filters.same_as(&other.filters)
            && self.query == other.query
            && self.sort == other.sort
            && self.visible.same_as(&other.visible)
    }
}

impl MemoKey for u64 {
    fn same_as(&self, other: &Self) -> bool {
        self == other
    }
}

/// The last computed value and the key it was computed for.
///
/// `V` is expected to be cheap to clone, typically an `Arc`.
#[derive(Debug)]
pub struct Memo<Key, V> {
    slot: Option<(Key, V)>,
    computations: usize,
}

impl<Key, V> Default for Memo<Key, V> {
    fn default() -> Self {
        Self {
            slot: None,
            computations: 0,
        }
    }
}

impl<Key: MemoKey, V: Clone> Memo<Key, V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key`, computing it when the key changed.
    pub fn get_or_compute(&mut self, key: Key, compute: impl FnOnce() -> V) -> V {
        if let Some((cached, value)) = &self.slot
            && cached.same_as(&key)
        {
            return value.clone();
        }
        tracing::trace!(computations = self.computations + 1, "Recomputing memoized view");
        let value = compute();
        self.computations += 1;
        self.slot = Some((key, value.clone()));
        value
    }

    /// Forget the cached value.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// How many times a value was computed.
    #[must_use]
    pub fn computations(&self) -> usize {
        self.computations
    }
}
