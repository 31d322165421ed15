use std::sync::Arc;

use log::{debug, warn};

use crate::{
    convert::Converter,
    glue::{CommandGlue, GlueError, GlueRef},
    native::{NativeCollectionChange, ObservableCollection, ObservableObject, Subscription},
    session::SessionContext,
    update::DeferredUpdate,
};

use super::{notify_graph, ChangeListener};

/// Forwards native change notifications to the remote mirror.
///
/// Collection and object notifications become deferred updates, applied on
/// the session's queue in the order the notifications arrived. Commands are
/// switched to listening. Everything is undone by [`detach`](Self::detach)
/// or on drop.
///
/// Nodes produced by the converter for new values are expected to be
/// mirrored by the time their update runs; unmirrored values are skipped.
pub struct ChangeRelay {
    context: SessionContext,
    converter: Arc<dyn Converter>,
    collections: Vec<(GlueRef, Subscription)>,
    objects: Vec<(GlueRef, Subscription)>,
    commands: Vec<GlueRef>,
}

impl ChangeRelay {
    pub fn new(context: SessionContext, converter: Arc<dyn Converter>) -> Self {
        Self {
            context,
            converter,
            collections: Vec::new(),
            objects: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Subscribes to every change source reachable from `root`. Returns the
    /// number of nodes visited.
    pub fn attach(&mut self, root: &GlueRef) -> usize {
        notify_graph(root, self)
    }

    pub fn subscription_count(&self) -> usize {
        self.collections.len() + self.objects.len() + self.commands.len()
    }

    pub fn detach(&mut self) {
        for (node, subscription) in self.collections.drain(..) {
            if let Some(source) = node
                .as_array()
                .and_then(|array| array.collection().observable())
            {
                source.unsubscribe(subscription);
            }
        }
        for (node, subscription) in self.objects.drain(..) {
            if let Some(source) = node.as_object().and_then(|object| object.object().observable())
            {
                source.unsubscribe(subscription);
            }
        }
        for node in self.commands.drain(..) {
            if let Some(command) = node.as_command() {
                if let Err(err) = command.stop_listening() {
                    warn!("Failed to stop listening on command: {}", err);
                }
            }
        }
    }
}

impl Drop for ChangeRelay {
    fn drop(&mut self) {
        self.detach();
    }
}

impl ChangeListener for ChangeRelay {
    fn on_collection_source(&mut self, node: &GlueRef, source: &dyn ObservableCollection) {
        let weak = Arc::downgrade(node);
        let context = self.context.clone();
        let converter = self.converter.clone();

        let subscription = source.subscribe(Arc::new(move |change: &NativeCollectionChange| {
            let Some(node) = weak.upgrade() else {
                return;
            };
            let Some(array) = node.as_array() else {
                return;
            };
            match array.request_update(change, converter.as_ref()) {
                Ok(update) => forward(&context, update),
                Err(err) => warn!("Native collection change could not be mirrored: {}", err),
            }
        }));

        self.collections.push((node.clone(), subscription));
    }

    fn on_command_source(&mut self, node: &GlueRef, command: &CommandGlue) {
        if let Err(err) = command.start_listening() {
            warn!("Command could not start listening: {}", err);
            return;
        }
        self.commands.push(node.clone());
    }

    fn on_object_source(&mut self, node: &GlueRef, source: &dyn ObservableObject) {
        let weak = Arc::downgrade(node);
        let context = self.context.clone();
        let converter = self.converter.clone();

        let subscription = source.subscribe(Arc::new(move |name: &str| {
            let Some(node) = weak.upgrade() else {
                return;
            };
            let Some(object) = node.as_object() else {
                return;
            };
            let Some(value) = object.object().property(name) else {
                debug!("Changed property {} has no readable value", name);
                return;
            };
            let update = converter
                .native_to_glue(&value)
                .map_err(GlueError::from)
                .and_then(|child| object.request_property_update(name, child));
            match update {
                Ok(update) => forward(&context, update),
                Err(err) => warn!("Property change of {} could not be mirrored: {}", name, err),
            }
        }));

        self.objects.push((node.clone(), subscription));
    }
}

fn forward(context: &SessionContext, update: DeferredUpdate) {
    if update.is_noop() {
        return;
    }
    let Some(session) = context.live_session() else {
        debug!("Session closed, dropping native change");
        return;
    };
    let task_context = context.clone();
    session.run_async(Box::new(move || task_context.apply(update)));
}
