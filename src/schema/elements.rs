//! Schema node types.

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One node of a resource type descriptor.
///
/// References are kept by name and only followed while a value is being
/// traversed, so self-referential definitions are safe to hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaNode {
    /// An object with a fixed set of named fields.
    Kind(Kind),
    /// A free-form string-keyed map of one element type.
    Map(Box<SchemaNode>),
    /// An ordered sequence of one element type.
    Array(Box<SchemaNode>),
    /// A leaf scalar.
    Primitive(Primitive),
    /// The name of a definition in the owning [`SchemaModel`](super::SchemaModel).
    Reference(String),
}

/// Kind describes an object type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Kind {
    /// Fields in declaration order, keyed by their remote (camelCase) name.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<Field>,

    /// Names of fields that must be present whenever the object is.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(skip)]
    field_map: OnceCell<HashMap<String, usize>>,
}

/// Field pairs a remote field name with its type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(rename = "type")]
    pub node: SchemaNode,
}

/// Primitive describes a scalar leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Primitive {
    #[serde(rename = "type")]
    pub primitive_type: PrimitiveType,

    /// Format discriminator, e.g. `int-or-string` or `date-time`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Declared scalar type of a primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    #[serde(other)]
    Untyped,
}

/// Format discriminator for values that may arrive as a number or a string.
pub const INT_OR_STRING: &str = "int-or-string";

/// Formats that carry no transcoding behaviour of their own.
const PASSTHROUGH_FORMATS: &[&str] = &[
    "int32",
    "int64",
    "float",
    "double",
    "byte",
    "binary",
    "date",
    "date-time",
    "duration",
    "password",
    "uri",
    "email",
    "hostname",
    "ipv4",
    "ipv6",
    "uuid",
    "quantity",
];

/// Classification of a primitive's format discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format<'a> {
    None,
    IntOrString,
    Passthrough,
    Unsupported(&'a str),
}

impl Kind {
    /// Creates a Kind with the given fields.
    pub fn with_fields(fields: Vec<Field>) -> Self {
        Kind {
            fields,
            ..Default::default()
        }
    }

    /// Marks the named fields as required.
    pub fn require(mut self, names: &[&str]) -> Self {
        self.required = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Returns the field with the given remote name, if declared.
    pub fn field(&self, name: &str) -> Option<&Field> {
        let map = self.field_map.get_or_init(|| {
            self.fields
                .iter()
                .enumerate()
                .map(|(i, f)| (f.name.clone(), i))
                .collect()
        });
        map.get(name).map(|&i| &self.fields[i])
    }

    /// Returns the fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }
}

impl Field {
    pub fn new(name: impl Into<String>, node: SchemaNode) -> Self {
        Field {
            name: name.into(),
            node,
        }
    }
}

impl Primitive {
    pub fn new(primitive_type: PrimitiveType) -> Self {
        Primitive {
            primitive_type,
            format: None,
        }
    }

    pub fn with_format(primitive_type: PrimitiveType, format: impl Into<String>) -> Self {
        Primitive {
            primitive_type,
            format: Some(format.into()),
        }
    }

    pub fn format(&self) -> Format<'_> {
        match self.format.as_deref() {
            None | Some("") => Format::None,
            Some(INT_OR_STRING) => Format::IntOrString,
            Some(f) if PASSTHROUGH_FORMATS.contains(&f) => Format::Passthrough,
            Some(f) => Format::Unsupported(f),
        }
    }
}

impl SchemaNode {
    pub fn kind(fields: Vec<Field>) -> Self {
        SchemaNode::Kind(Kind::with_fields(fields))
    }

    pub fn map_of(sub_type: SchemaNode) -> Self {
        SchemaNode::Map(Box::new(sub_type))
    }

    pub fn array_of(sub_type: SchemaNode) -> Self {
        SchemaNode::Array(Box::new(sub_type))
    }

    pub fn string() -> Self {
        SchemaNode::Primitive(Primitive::new(PrimitiveType::String))
    }

    pub fn integer() -> Self {
        SchemaNode::Primitive(Primitive::new(PrimitiveType::Integer))
    }

    pub fn boolean() -> Self {
        SchemaNode::Primitive(Primitive::new(PrimitiveType::Boolean))
    }

    pub fn int_or_string() -> Self {
        SchemaNode::Primitive(Primitive::with_format(PrimitiveType::String, INT_OR_STRING))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        SchemaNode::Reference(name.into())
    }

    /// Short name of the node variant, used in error messages.
    pub fn variant_name(&self) -> &'static str {
        match self {
            SchemaNode::Kind(_) => "kind",
            SchemaNode::Map(_) => "map",
            SchemaNode::Array(_) => "array",
            SchemaNode::Primitive(_) => "primitive",
            SchemaNode::Reference(_) => "reference",
        }
    }
}
