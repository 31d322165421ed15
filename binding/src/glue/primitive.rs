use crate::types::RemoteValue;

use super::description::DescriptionBuilder;

/// Scalar carried by a primitive node.
#[derive(Clone, Debug, PartialEq)]
pub enum PrimitiveValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl PrimitiveValue {
    pub fn to_remote(&self) -> RemoteValue {
        match self {
            PrimitiveValue::Null => RemoteValue::Null,
            PrimitiveValue::Bool(value) => RemoteValue::Bool(*value),
            PrimitiveValue::Int(value) => RemoteValue::Int(*value),
            PrimitiveValue::Float(value) => RemoteValue::Float(*value),
            PrimitiveValue::String(value) => RemoteValue::String(value.clone()),
        }
    }
}

/// Leaf node around a native scalar. Never observable.
pub struct PrimitiveGlue {
    value: PrimitiveValue,
}

impl PrimitiveGlue {
    pub(crate) fn new(value: PrimitiveValue) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &PrimitiveValue {
        &self.value
    }

    pub fn describe(&self, ctx: &mut DescriptionBuilder) {
        match &self.value {
            PrimitiveValue::Null => ctx.append("null"),
            PrimitiveValue::Bool(value) => ctx.append(if *value { "true" } else { "false" }),
            PrimitiveValue::Int(value) => ctx.append(&value.to_string()),
            PrimitiveValue::Float(value) => ctx.append(&value.to_string()),
            PrimitiveValue::String(value) => ctx.append_quoted(value),
        }
    }
}
