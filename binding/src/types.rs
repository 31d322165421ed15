use std::{
    any::{Any, TypeId},
    fmt,
    sync::Arc,
};

/// A native application value, shared with the graph root and never copied.
pub type NativeValue = Arc<dyn Any + Send + Sync>;

/// Identifier assigned by the remote session when a node is mirrored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u32);

impl SessionId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to an object living in the remote session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MirrorHandle(u64);

impl MirrorHandle {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// The pair assigned to a node by the mirroring step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MirrorBinding {
    pub session_id: SessionId,
    pub handle: MirrorHandle,
}

impl MirrorBinding {
    pub fn new(session_id: SessionId, handle: MirrorHandle) -> Self {
        Self { session_id, handle }
    }
}

/// Element type of a native collection, used to coerce remote values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ElementType {
    type_id: TypeId,
    name: &'static str,
}

impl ElementType {
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Options attached to a remote property write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Whether the remote side may write back into the assigned child.
    pub child_allow_write: bool,
}

impl WriteOptions {
    pub fn read_only() -> Self {
        Self {
            child_allow_write: false,
        }
    }

    pub fn writable() -> Self {
        Self {
            child_allow_write: true,
        }
    }
}

/// A value as seen by the remote session: arguments of remote invocations,
/// items of remote change batches, and payloads of property writes.
#[derive(Clone, Debug, PartialEq)]
pub enum RemoteValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Handle(MirrorHandle),
}

impl RemoteValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RemoteValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RemoteValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            RemoteValue::Int(value) => Some(*value),
            _ => None,
        }
    }
}

impl fmt::Display for RemoteValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteValue::Null => f.write_str("null"),
            RemoteValue::Bool(value) => write!(f, "{}", value),
            RemoteValue::Int(value) => write!(f, "{}", value),
            RemoteValue::Float(value) => write!(f, "{}", value),
            RemoteValue::String(value) => write!(f, "{:?}", value),
            RemoteValue::Handle(handle) => write!(f, "#{}", handle.value()),
        }
    }
}
