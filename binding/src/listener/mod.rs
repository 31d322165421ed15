//! Routing glue nodes to the handler for their kind of native change source.
//!
//! [`GlueNode::notify_if_observable`](crate::GlueNode::notify_if_observable)
//! is the only place that decides, per variant, whether a node can push
//! native-originated changes. Everything here builds on it.

mod change_relay;
mod source_collector;

use std::collections::HashSet;

use crate::{
    glue::{CommandGlue, GlueRef},
    native::{ObservableCollection, ObservableObject},
};

pub use change_relay::ChangeRelay;
pub use source_collector::SourceCollector;

/// Receives the change sources found on glue nodes.
pub trait ChangeListener {
    fn on_collection_source(&mut self, node: &GlueRef, source: &dyn ObservableCollection);

    fn on_command_source(&mut self, node: &GlueRef, command: &CommandGlue);

    fn on_object_source(&mut self, node: &GlueRef, source: &dyn ObservableObject);
}

/// Calls `notify_if_observable` once for every node reachable from `root`,
/// parents before children, children in order. Returns the number of
/// distinct nodes visited.
pub fn notify_graph(root: &GlueRef, listener: &mut dyn ChangeListener) -> usize {
    let mut visited = HashSet::new();
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if !visited.insert(node.address()) {
            continue;
        }
        node.notify_if_observable(listener);
        stack.extend(node.children().into_iter().rev());
    }

    visited.len()
}
