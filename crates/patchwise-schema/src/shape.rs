//! Declarative shape descriptions for JSON documents.
//!
//! Shapes are plain `const` data. A pipeline declares the contract it
//! expects from a capability backend once, as a static tree, and hands it
//! to [`crate::validate`] together with the raw reply.

/// One required field of an object shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    /// Key the field must appear under.
    pub name: &'static str,
    /// Shape its value must satisfy.
    pub shape: Shape,
}

/// Expected shape of a JSON value.
///
/// Object shapes list required fields only. Keys that are present in the
/// document but not listed are ignored, so backends are free to attach
/// extra detail without breaking the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Any JSON string.
    String,
    /// A JSON boolean.
    Bool,
    /// A JSON number with no fractional part.
    Integer,
    /// A JSON string drawn from a fixed set of values.
    Enum(&'static [&'static str]),
    /// A JSON array whose elements all satisfy the inner shape.
    Array(&'static Shape),
    /// A JSON object carrying at least the listed fields.
    Object(&'static [Field]),
}

impl Shape {
    /// Human-readable name of the expected type, used in violation reports.
    #[inline]
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String | Self::Enum(_) => "string",
            Self::Bool => "boolean",
            Self::Integer => "integer",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }
}
