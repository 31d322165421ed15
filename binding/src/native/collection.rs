use std::{any::Any, sync::Arc};

use crate::types::NativeValue;

use super::subscription::Subscription;

/// A change observed on a native collection, reported after it happened.
#[derive(Clone, Debug)]
pub enum NativeCollectionChange {
    Add { index: usize, value: NativeValue },
    Remove { index: usize },
    Replace { index: usize, value: NativeValue },
    Move { old_index: usize, new_index: usize },
    Reset,
}

pub type CollectionChangedHandler = Arc<dyn Fn(&NativeCollectionChange) + Send + Sync>;

/// An ordered native collection wrapped by an array glue node.
pub trait NativeCollection: Any + Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, index: usize) -> Option<NativeValue>;

    /// Write access used when replaying remote edits. Read-only collections
    /// return `None` and remote edits against them are ignored.
    fn as_list(&self) -> Option<&dyn NativeList> {
        None
    }

    /// Change-notification capability, if the collection has one.
    fn observable(&self) -> Option<&dyn ObservableCollection> {
        None
    }
}

/// Mutating access to a native collection.
///
/// Methods take `&self`: the collection is shared with the graph root and
/// serialization of writes is the caller's contract.
pub trait NativeList {
    fn push(&self, value: NativeValue);
    fn insert(&self, index: usize, value: NativeValue);
    fn remove_at(&self, index: usize);
}

/// Native source of collection change notifications.
pub trait ObservableCollection: Send + Sync {
    fn subscribe(&self, handler: CollectionChangedHandler) -> Subscription;
    fn unsubscribe(&self, subscription: Subscription);
}
