use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use log::{debug, warn};

use crate::{
    listener::ChangeListener,
    native::NativeObject,
    types::{RemoteValue, WriteOptions},
    update::DeferredUpdate,
};

use super::{
    build::BuildInstruction,
    description::DescriptionBuilder,
    error::GlueError,
    node::{GlueRef, MirrorCell},
};

/// A native object with a fixed set of named properties, each a child node.
pub struct ObjectGlue {
    object: Arc<dyn NativeObject>,
    properties: RwLock<Vec<(String, GlueRef)>>,
    mirror: MirrorCell,
}

impl ObjectGlue {
    pub(crate) fn new(
        object: Arc<dyn NativeObject>,
        properties: impl IntoIterator<Item = (String, GlueRef)>,
        mirror: MirrorCell,
    ) -> Self {
        Self {
            object,
            properties: RwLock::new(properties.into_iter().collect()),
            mirror,
        }
    }

    pub fn object(&self) -> &dyn NativeObject {
        self.object.as_ref()
    }

    fn read_properties(&self) -> RwLockReadGuard<'_, Vec<(String, GlueRef)>> {
        self.properties.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn property(&self, name: &str) -> Option<GlueRef> {
        self.read_properties()
            .iter()
            .find(|(property, _)| property == name)
            .map(|(_, node)| node.clone())
    }

    pub fn properties(&self) -> Vec<(String, GlueRef)> {
        self.read_properties().clone()
    }

    pub fn children(&self) -> Vec<GlueRef> {
        self.read_properties()
            .iter()
            .map(|(_, node)| node.clone())
            .collect()
    }

    pub fn build_instruction(&self) -> BuildInstruction {
        BuildInstruction::Object {
            properties: self.properties(),
        }
    }

    /// Replaces the node held by `name` now; the returned update assigns
    /// the new node's mirror to the remote property.
    pub fn request_property_update(
        &self,
        name: &str,
        node: GlueRef,
    ) -> Result<DeferredUpdate, GlueError> {
        {
            let mut properties = self
                .properties
                .write()
                .map_err(|_| GlueError::LockPoisoned)?;
            let Some(slot) = properties.iter_mut().find(|(property, _)| property == name) else {
                return Err(GlueError::UnknownProperty {
                    name: name.to_string(),
                });
            };
            slot.1 = node.clone();
        }

        let mirror = self.mirror.clone();
        let name = name.to_string();
        Ok(DeferredUpdate::new(move |updater| {
            let Some(target) = mirror.handle() else {
                debug!("Object has no mirror yet, skipping update of {}", name);
                return;
            };
            let Some(value) = node.mirror_handle() else {
                warn!("New value of {} has no mirror, skipping update", name);
                return;
            };
            updater.update_property(
                &target,
                &name,
                RemoteValue::Handle(value),
                WriteOptions::writable(),
            );
        }))
    }

    pub fn describe(&self, ctx: &mut DescriptionBuilder) {
        let properties = self.properties();
        ctx.append("{");
        for (index, (name, node)) in properties.iter().enumerate() {
            if index != 0 {
                ctx.append(",");
            }
            ctx.append_quoted(name);
            ctx.append(":");
            ctx.with_property(name, |ctx| node.describe(ctx));
        }
        ctx.append("}");
    }

    pub fn notify_if_observable(&self, node: &GlueRef, listener: &mut dyn ChangeListener) {
        if let Some(source) = self.object.observable() {
            listener.on_object_source(node, source);
        }
    }
}
