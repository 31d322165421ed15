use super::{node::GlueRef, primitive::PrimitiveValue};

/// What the remote side must create to mirror a node for the first time.
#[derive(Debug, Clone)]
pub enum BuildInstruction {
    Array { items: Vec<GlueRef> },
    Command { can_execute: bool },
    Object { properties: Vec<(String, GlueRef)> },
    Primitive { value: PrimitiveValue },
}

impl BuildInstruction {
    pub fn dispatch(&self, builder: &mut dyn MirrorBuilder) {
        match self {
            BuildInstruction::Array { items } => builder.request_array_creation(items),
            BuildInstruction::Command { can_execute } => {
                builder.request_command_creation(*can_execute)
            }
            BuildInstruction::Object { properties } => {
                builder.request_object_creation(properties)
            }
            BuildInstruction::Primitive { value } => builder.request_primitive_creation(value),
        }
    }
}

/// Creates mirror objects in the remote session. Implemented by the remote
/// runtime.
pub trait MirrorBuilder {
    fn request_array_creation(&mut self, items: &[GlueRef]);
    fn request_command_creation(&mut self, can_execute: bool);
    fn request_object_creation(&mut self, properties: &[(String, GlueRef)]);
    fn request_primitive_creation(&mut self, value: &PrimitiveValue);
}
