use thiserror::Error;

use crate::{
    glue::GlueRef,
    types::{ElementType, NativeValue, RemoteValue},
};

/// Errors raised while turning native or remote values into glue nodes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// The remote value cannot be coerced into the collection's element type
    #[error("Cannot convert remote value {value} into {element_type}")]
    UnsupportedRemoteValue {
        value: String,
        element_type: &'static str,
    },

    /// The remote value references a handle the converter has never seen
    #[error("Remote handle #{handle} is not mapped to any native value")]
    UnknownHandle { handle: u64 },

    /// The native value has no glue representation
    #[error("Native value has no glue representation")]
    UnsupportedNativeValue,
}

/// Translates values across the boundary. Supplied by the binding host,
/// usually backed by a cache of already-mirrored nodes.
pub trait Converter: Send + Sync {
    /// Builds (or looks up) the node wrapping a native value.
    fn native_to_glue(&self, value: &NativeValue) -> Result<GlueRef, ConversionError>;

    /// Builds (or looks up) the node for a remote value, coerced into
    /// `element_type`.
    fn to_glue(
        &self,
        value: &RemoteValue,
        element_type: &ElementType,
    ) -> Result<GlueRef, ConversionError>;

    /// The native value of the first remote argument, if there is one.
    fn first_argument_or_none(&self, args: &[RemoteValue]) -> Option<NativeValue>;
}
