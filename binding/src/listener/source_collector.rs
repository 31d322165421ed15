use log::warn;

use crate::{
    glue::{CommandGlue, GlueError, GlueRef},
    native::{ObservableCollection, ObservableObject},
};

use super::{notify_graph, ChangeListener};

/// A listener that records which nodes expose change sources.
#[derive(Default)]
pub struct SourceCollector {
    collections: Vec<GlueRef>,
    commands: Vec<GlueRef>,
    objects: Vec<GlueRef>,
}

impl SourceCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects the sources of every node reachable from `root`.
    pub fn collect(root: &GlueRef) -> Self {
        let mut collector = Self::new();
        notify_graph(root, &mut collector);
        collector
    }

    pub fn collections(&self) -> &[GlueRef] {
        &self.collections
    }

    pub fn commands(&self) -> &[GlueRef] {
        &self.commands
    }

    pub fn objects(&self) -> &[GlueRef] {
        &self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty() && self.commands.is_empty() && self.objects.is_empty()
    }

    /// Starts listening on every collected command, stopping at the first
    /// failure.
    pub fn start_listening_commands(&self) -> Result<(), GlueError> {
        for node in &self.commands {
            node.try_as_command("start listening")?.start_listening()?;
        }
        Ok(())
    }

    /// Stops listening on every collected command. Failures are logged and
    /// the remaining commands are still stopped.
    pub fn stop_listening_commands(&self) {
        for node in &self.commands {
            let result = node
                .try_as_command("stop listening")
                .and_then(|command| command.stop_listening());
            if let Err(err) = result {
                warn!("Failed to stop listening on command: {}", err);
            }
        }
    }
}

impl ChangeListener for SourceCollector {
    fn on_collection_source(&mut self, node: &GlueRef, _: &dyn ObservableCollection) {
        self.collections.push(node.clone());
    }

    fn on_command_source(&mut self, node: &GlueRef, _: &CommandGlue) {
        self.commands.push(node.clone());
    }

    fn on_object_source(&mut self, node: &GlueRef, _: &dyn ObservableObject) {
        self.objects.push(node.clone());
    }
}
