//! The shadow graph: one [`GlueNode`] per native value, in four variants.

mod array;
mod build;
mod command;
mod description;
mod error;
mod node;
mod object;
mod primitive;

pub use array::ArrayGlue;
pub use build::{BuildInstruction, MirrorBuilder};
pub use command::{CanExecuteOutcome, CommandGlue, CommandLifecycle};
pub use description::DescriptionBuilder;
pub use error::GlueError;
pub use node::{GlueKind, GlueNode, GlueRef, GlueVariant};
pub use object::ObjectGlue;
pub use primitive::{PrimitiveGlue, PrimitiveValue};
