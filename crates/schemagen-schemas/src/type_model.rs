//! Typed object model consumed by the type mapper.
//!
//! The model is a flat list of classes and enumerations. Fields reference
//! primitives, other model types by fully-qualified name, or one of the two
//! wrapper kinds (`date`, `reference`) that become synthetic definitions.
//!
//! ```json
//! {
//!   "classes": [{
//!     "name": "Order",
//!     "namespace": "com.acme",
//!     "fields": [
//!       { "name": "id", "type": "string" },
//!       { "name": "placed", "type": "date" },
//!       { "name": "status", "type": { "named": "com.acme.Status" } },
//!       { "name": "notes", "type": "string", "repeated": true }
//!     ]
//!   }],
//!   "enums": [{ "name": "Status", "namespace": "com.acme",
//!               "symbols": ["OPEN", "CLOSED"] }]
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Root of the object model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeModel {
    #[serde(default)]
    pub classes: Vec<ClassInfo>,

    #[serde(default)]
    pub enums: Vec<EnumInfo>,
}

/// A class with named, typed fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
}

/// An enumeration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumInfo {
    pub name: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    pub symbols: Vec<String>,
}

/// A class field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: TypeRef,

    /// The field may be absent. Ignored when `repeated` is set, since an
    /// absent list is modeled as an empty one.
    #[serde(default)]
    pub optional: bool,

    /// The field holds a list of values.
    #[serde(default)]
    pub repeated: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

/// The declared type of a field.
///
/// Primitives are written as bare strings (`"long"`), as are the two
/// wrapper kinds (`"date"`, `"reference"`). Model types are written as
/// `{"named": "a.b.Foo"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeRef {
    /// A timestamp, mapped to the synthetic date wrapper.
    Date,
    /// A reference to another object by id, mapped to the synthetic
    /// reference wrapper.
    Reference,
    /// Another class or enum of the model, by fully-qualified name.
    Named(String),
    #[serde(untagged)]
    Primitive(Primitive),
}

/// Avro primitive types a field can declare directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
}

impl Primitive {
    /// Avro name of the primitive.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Bytes => "bytes",
            Primitive::String => "string",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_documented_example() {
        let json = r#"{
            "classes": [{
                "name": "Order",
                "namespace": "com.acme",
                "fields": [
                    { "name": "id", "type": "string" },
                    { "name": "placed", "type": "date" },
                    { "name": "status", "type": { "named": "com.acme.Status" } },
                    { "name": "notes", "type": "string", "repeated": true }
                ]
            }],
            "enums": [{ "name": "Status", "namespace": "com.acme",
                        "symbols": ["OPEN", "CLOSED"] }]
        }"#;

        let model: TypeModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.classes.len(), 1);
        assert_eq!(model.enums.len(), 1);

        let fields = &model.classes[0].fields;
        assert_eq!(fields[1].ty, TypeRef::Date);
        assert_eq!(
            fields[2].ty,
            TypeRef::Named("com.acme.Status".to_owned())
        );
        assert!(fields[3].repeated);
        assert!(!fields[3].optional);
    }

    #[test]
    fn test_primitive_names() {
        assert_eq!(Primitive::Long.name(), "long");
        assert_eq!(Primitive::Bytes.name(), "bytes");
    }

    /// Primitives and wrapper kinds share the bare-string form.
    #[test]
    fn test_type_ref_forms() {
        let types: Vec<TypeRef> = serde_json::from_str(
            r#"["long", "date", "reference", "string", {"named": "a.B"}]"#,
        )
        .unwrap();

        assert_eq!(
            types,
            [
                TypeRef::Primitive(Primitive::Long),
                TypeRef::Date,
                TypeRef::Reference,
                TypeRef::Primitive(Primitive::String),
                TypeRef::Named("a.B".to_owned()),
            ]
        );
        assert_eq!(
            serde_json::to_string(&TypeRef::Primitive(Primitive::Int)).unwrap(),
            r#""int""#
        );
    }
}
