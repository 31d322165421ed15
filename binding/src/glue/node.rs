use std::{
    any::Any,
    fmt,
    sync::{Arc, OnceLock},
};

use crate::{
    convert::Converter,
    listener::ChangeListener,
    native::{Command, NativeCollection, NativeObject},
    session::SessionContext,
    types::{ElementType, MirrorBinding, MirrorHandle, NativeValue, SessionId},
};

use super::{
    array::ArrayGlue,
    build::BuildInstruction,
    command::CommandGlue,
    description::DescriptionBuilder,
    error::GlueError,
    object::ObjectGlue,
    primitive::{PrimitiveGlue, PrimitiveValue},
};

pub type GlueRef = Arc<GlueNode>;

/// Tag of a node's variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GlueVariant {
    Array,
    Command,
    Object,
    Primitive,
}

impl GlueVariant {
    pub fn name(&self) -> &'static str {
        match self {
            GlueVariant::Array => "Array",
            GlueVariant::Command => "Command",
            GlueVariant::Object => "Object",
            GlueVariant::Primitive => "Primitive",
        }
    }
}

impl fmt::Display for GlueVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Write-once slot for a node's mirror, shared with the variant so deferred
/// updates can resolve the handle when they are applied.
#[derive(Clone, Default)]
pub(crate) struct MirrorCell(Arc<OnceLock<MirrorBinding>>);

impl MirrorCell {
    pub(crate) fn get(&self) -> Option<MirrorBinding> {
        self.0.get().copied()
    }

    pub(crate) fn handle(&self) -> Option<MirrorHandle> {
        self.get().map(|binding| binding.handle)
    }

    pub(crate) fn set(&self, binding: MirrorBinding) -> Result<(), GlueError> {
        self.0.set(binding).map_err(|_| GlueError::AlreadyMirrored {
            session_id: self
                .get()
                .map(|existing| existing.session_id)
                .unwrap_or(binding.session_id),
        })
    }
}

pub enum GlueKind {
    Array(ArrayGlue),
    Command(CommandGlue),
    Object(ObjectGlue),
    Primitive(PrimitiveGlue),
}

/// One native value in the shadow graph.
///
/// The session id and mirror handle are absent until
/// [`set_mapped_remote_value`](Self::set_mapped_remote_value) succeeds, and
/// never change afterwards.
pub struct GlueNode {
    native: NativeValue,
    mirror: MirrorCell,
    kind: GlueKind,
}

impl GlueNode {
    pub fn new_array<C: NativeCollection>(
        items: impl IntoIterator<Item = GlueRef>,
        collection: Arc<C>,
        element_type: ElementType,
    ) -> GlueRef {
        let mirror = MirrorCell::default();
        let native: NativeValue = collection.clone();
        let array = ArrayGlue::new(items, collection, element_type, mirror.clone());
        Arc::new(Self {
            native,
            mirror,
            kind: GlueKind::Array(array),
        })
    }

    pub fn new_command<C: Command>(
        context: &SessionContext,
        converter: Arc<dyn Converter>,
        command: Arc<C>,
    ) -> GlueRef {
        let mirror = MirrorCell::default();
        let native: NativeValue = command.clone();
        let command = CommandGlue::new(context, converter, command, mirror.clone());
        Arc::new(Self {
            native,
            mirror,
            kind: GlueKind::Command(command),
        })
    }

    pub fn new_object<O: NativeObject>(
        object: Arc<O>,
        properties: impl IntoIterator<Item = (String, GlueRef)>,
    ) -> GlueRef {
        let mirror = MirrorCell::default();
        let native: NativeValue = object.clone();
        let object = ObjectGlue::new(object, properties, mirror.clone());
        Arc::new(Self {
            native,
            mirror,
            kind: GlueKind::Object(object),
        })
    }

    pub fn new_primitive<T: Any + Send + Sync>(native: T, value: PrimitiveValue) -> GlueRef {
        Self::new_primitive_shared(Arc::new(native), value)
    }

    /// Like [`new_primitive`](Self::new_primitive), for a native value the
    /// graph already shares.
    pub fn new_primitive_shared(native: NativeValue, value: PrimitiveValue) -> GlueRef {
        Arc::new(Self {
            native,
            mirror: MirrorCell::default(),
            kind: GlueKind::Primitive(PrimitiveGlue::new(value)),
        })
    }

    pub fn native_value(&self) -> &NativeValue {
        &self.native
    }

    /// Whether this node wraps exactly `value` (same allocation).
    pub fn wraps(&self, value: &NativeValue) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.native), Arc::as_ptr(value))
    }

    pub fn kind(&self) -> &GlueKind {
        &self.kind
    }

    pub fn variant(&self) -> GlueVariant {
        match &self.kind {
            GlueKind::Array(_) => GlueVariant::Array,
            GlueKind::Command(_) => GlueVariant::Command,
            GlueKind::Object(_) => GlueVariant::Object,
            GlueKind::Primitive(_) => GlueVariant::Primitive,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayGlue> {
        match &self.kind {
            GlueKind::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&CommandGlue> {
        match &self.kind {
            GlueKind::Command(command) => Some(command),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectGlue> {
        match &self.kind {
            GlueKind::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<&PrimitiveGlue> {
        match &self.kind {
            GlueKind::Primitive(primitive) => Some(primitive),
            _ => None,
        }
    }

    /// Like [`as_array`](Self::as_array), failing with
    /// [`GlueError::WrongVariant`] for other variants.
    pub fn try_as_array(&self, operation: &'static str) -> Result<&ArrayGlue, GlueError> {
        self.as_array().ok_or(GlueError::WrongVariant {
            operation,
            variant: self.variant(),
        })
    }

    pub fn try_as_command(&self, operation: &'static str) -> Result<&CommandGlue, GlueError> {
        self.as_command().ok_or(GlueError::WrongVariant {
            operation,
            variant: self.variant(),
        })
    }

    pub fn try_as_object(&self, operation: &'static str) -> Result<&ObjectGlue, GlueError> {
        self.as_object().ok_or(GlueError::WrongVariant {
            operation,
            variant: self.variant(),
        })
    }

    // Mirroring

    pub fn session_id(&self) -> Option<SessionId> {
        self.mirror.get().map(|binding| binding.session_id)
    }

    pub fn mirror_handle(&self) -> Option<MirrorHandle> {
        self.mirror.handle()
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirror.get().is_some()
    }

    /// Records the mirror created for this node. Commands additionally
    /// register their remote entry points.
    pub fn set_mapped_remote_value(&self, binding: MirrorBinding) -> Result<(), GlueError> {
        match &self.kind {
            GlueKind::Command(command) => command.bind(binding),
            _ => self.mirror.set(binding),
        }
    }

    pub fn build_instruction(&self) -> BuildInstruction {
        match &self.kind {
            GlueKind::Array(array) => array.build_instruction(),
            GlueKind::Command(command) => command.build_instruction(),
            GlueKind::Object(object) => object.build_instruction(),
            GlueKind::Primitive(primitive) => BuildInstruction::Primitive {
                value: primitive.value().clone(),
            },
        }
    }

    // Graph

    pub fn children(&self) -> Vec<GlueRef> {
        match &self.kind {
            GlueKind::Array(array) => array.children(),
            GlueKind::Object(object) => object.children(),
            GlueKind::Command(_) | GlueKind::Primitive(_) => Vec::new(),
        }
    }

    /// Routes this node to the listener callback matching its variant, when
    /// the wrapped native value can report changes.
    pub fn notify_if_observable(self: &Arc<Self>, listener: &mut dyn ChangeListener) {
        match &self.kind {
            GlueKind::Array(array) => array.notify_if_observable(self, listener),
            GlueKind::Command(command) => command.notify_if_observable(self, listener),
            GlueKind::Object(object) => object.notify_if_observable(self, listener),
            GlueKind::Primitive(_) => {}
        }
    }

    pub(crate) fn address(&self) -> usize {
        self as *const Self as usize
    }

    pub fn describe(&self, ctx: &mut DescriptionBuilder) {
        if let GlueKind::Primitive(primitive) = &self.kind {
            primitive.describe(ctx);
            return;
        }
        if !ctx.enter(self.address()) {
            return;
        }
        match &self.kind {
            GlueKind::Array(array) => array.describe(ctx),
            GlueKind::Command(command) => command.describe(ctx),
            GlueKind::Object(object) => object.describe(ctx),
            GlueKind::Primitive(_) => {}
        }
    }
}

impl fmt::Display for GlueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ctx = DescriptionBuilder::new();
        self.describe(&mut ctx);
        f.write_str(&ctx.finish())
    }
}

impl fmt::Debug for GlueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlueNode")
            .field("variant", &self.variant())
            .field("session_id", &self.session_id())
            .finish()
    }
}
