//! Named Avro definitions and the schema-set interchange format.
//!
//! A [`NamedSchema`] pairs an Avro named type (the body that ends up in the
//! `.avsc` files) with the list of other named types it references. The
//! dependency list never appears in the rendered schema; it only drives the
//! ordering phase.
//!
//! Graph identity is the fully-qualified name (`namespace.name`), while
//! collision detection works on the short name alone.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::SyntheticRequests;

/// Joins a namespace and a short name into a fully-qualified name.
///
/// An empty namespace yields the bare short name, matching how Avro
/// resolves names in the null namespace.
pub fn qualified_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_owned()
    } else {
        format!("{namespace}.{name}")
    }
}

/// One named schema definition: the unit of output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSchema {
    /// Fully-qualified names of the definitions this one references.
    ///
    /// Names that never resolve to a real definition are tolerated; the
    /// resolver treats them as already satisfied.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,

    /// The Avro body rendered into the output files.
    pub schema: NamedType,
}

impl NamedSchema {
    /// Creates a definition with the given body and dependency list.
    pub fn new(schema: NamedType, dependencies: Vec<String>) -> Self {
        Self {
            dependencies,
            schema,
        }
    }

    /// Short name of the definition.
    pub fn name(&self) -> &str {
        self.schema.name()
    }

    /// Dotted namespace of the definition.
    pub fn namespace(&self) -> &str {
        self.schema.namespace()
    }

    /// Fully-qualified name, used as the graph identity.
    pub fn full_name(&self) -> String {
        qualified_name(self.namespace(), self.name())
    }
}

/// An Avro named type.
///
/// Serializes to the Avro JSON form, e.g.
/// `{"type": "record", "name": "Foo", "namespace": "a.b", "fields": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NamedType {
    Record(RecordType),
    Enum(EnumType),
}

impl NamedType {
    /// Short name of the type.
    pub fn name(&self) -> &str {
        match self {
            NamedType::Record(record) => &record.name,
            NamedType::Enum(enumeration) => &enumeration.name,
        }
    }

    /// Dotted namespace of the type.
    pub fn namespace(&self) -> &str {
        match self {
            NamedType::Record(record) => &record.namespace,
            NamedType::Enum(enumeration) => &enumeration.namespace,
        }
    }
}

/// Body of an Avro `record`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordType {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub fields: Vec<Field>,
}

/// Body of an Avro `enum`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub symbols: Vec<String>,
}

/// One field of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: FieldType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,

    /// Default value. The mapper writes the placeholder strings
    /// [`EMPTY_ARRAY_DEFAULT`] and [`NULL_DEFAULT`] here; the renderer
    /// turns them into real JSON literals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// Placeholder default for repeated fields, rendered as `[]`.
pub const EMPTY_ARRAY_DEFAULT: &str = "[]";

/// Placeholder default for optional fields, rendered as `null`.
pub const NULL_DEFAULT: &str = "null";

/// The type of a record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldType {
    /// A primitive (`"string"`) or a reference to a named type
    /// (`"a.b.Foo"`).
    Name(String),
    /// A union such as `["null", "string"]`.
    Union(Vec<FieldType>),
    /// A complex type written inline.
    Complex(ComplexType),
}

impl FieldType {
    /// Wraps `self` in the union `["null", self]`.
    #[must_use]
    pub fn nullable(self) -> Self {
        FieldType::Union(vec![FieldType::Name("null".to_owned()), self])
    }

    /// Wraps `self` in an array.
    #[must_use]
    pub fn array(self) -> Self {
        FieldType::Complex(ComplexType::Array {
            items: Box::new(self),
        })
    }
}

/// Inline complex Avro types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ComplexType {
    Array { items: Box<FieldType> },
}

/// Mapped definitions plus the synthetic requests recorded while mapping.
///
/// This is the input of the ordering and emission phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSet {
    pub schemas: Vec<NamedSchema>,

    #[serde(default)]
    pub synthetic: SyntheticRequests,
}
