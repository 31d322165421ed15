use thiserror::Error;

use crate::{convert::ConversionError, types::SessionId};

use super::node::GlueVariant;

/// Errors raised by glue nodes while mutating the shadow graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlueError {
    /// A local request addressed an index outside the shadow list
    #[error("Cannot {operation} at index {index}: shadow list has {len} items")]
    IndexOutOfBounds {
        operation: &'static str,
        index: usize,
        len: usize,
    },

    /// A remote diff addressed an index outside the collection at the point
    /// it would have been replayed
    #[error("Protocol violation: remote {operation} at index {index} on a collection of {len} items")]
    ProtocolViolation {
        operation: &'static str,
        index: usize,
        len: usize,
    },

    /// The node already has a mirror; mirrors are assigned exactly once
    #[error("Node is already mirrored as session id {session_id}")]
    AlreadyMirrored { session_id: SessionId },

    /// The operation only exists for another node variant
    #[error("Cannot {operation} on a {variant} node")]
    WrongVariant {
        operation: &'static str,
        variant: GlueVariant,
    },

    /// An object node has no property with that name
    #[error("Object node has no property named {name}")]
    UnknownProperty { name: String },

    /// The command lifecycle does not allow the operation in its current state
    #[error("{from_state} command should never {operation}")]
    InvalidCommandTransition {
        from_state: &'static str,
        operation: &'static str,
    },

    /// A previous panic left the node's state unusable for writes
    #[error("Node state lock poisoned by an earlier panic")]
    LockPoisoned,

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
