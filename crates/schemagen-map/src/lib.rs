//! Type mapping: object model classes and enums to named Avro definitions.
//!
//! Mapping is the first phase of schema generation. Each class becomes an
//! Avro `record` and each enumeration an Avro `enum`. While translating
//! fields the mapper collects:
//!
//! - the fully-qualified names of other model types a definition refers to,
//!   which later drive dependency ordering, and
//! - requests for synthetic wrapper definitions (date, reference), recorded
//!   per namespace in a [`SyntheticRequests`] owned by the current run.
//!
//! The [`TypeMapper`] trait is the seam for alternative mapping rules;
//! [`AvroTypeMapper`] is the default.

use indexmap::IndexSet;
use schemagen_schemas::{
    ClassInfo, EMPTY_ARRAY_DEFAULT, EnumInfo, EnumType, Field, FieldInfo,
    FieldType, NULL_DEFAULT, NamedSchema, NamedType, RecordType, SchemaSet,
    SyntheticKind, SyntheticRequests, TypeModel, TypeRef, qualified_name,
};
use serde_json::Value;
use tracing::{debug, debug_span};

/// Rules that turn one model type into one named definition.
pub trait TypeMapper {
    /// Maps a class. Synthetic wrappers needed by its fields are recorded
    /// in `synthetic`.
    fn map_class(
        &self,
        class: &ClassInfo,
        synthetic: &mut SyntheticRequests,
    ) -> NamedSchema;

    /// Maps an enumeration.
    fn map_enum(&self, info: &EnumInfo) -> NamedSchema;
}

/// Maps every enum and class of the model.
///
/// Enums are mapped before classes. The returned set carries the synthetic
/// requests gathered during this call only.
pub fn map_model(model: &TypeModel, mapper: &impl TypeMapper) -> SchemaSet {
    let _span = debug_span!("map_model").entered();

    let mut synthetic = SyntheticRequests::default();
    let mut schemas =
        Vec::with_capacity(model.enums.len() + model.classes.len());

    schemas.extend(model.enums.iter().map(|info| mapper.map_enum(info)));
    schemas.extend(
        model
            .classes
            .iter()
            .map(|class| mapper.map_class(class, &mut synthetic)),
    );

    debug!(
        schemas = schemas.len(),
        synthetic = synthetic.len(),
        "mapped type model"
    );
    SchemaSet { schemas, synthetic }
}

/// Default mapping rules onto Avro records and enums.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvroTypeMapper;

impl AvroTypeMapper {
    /// Translates one declared type, recording what it pulls in.
    fn field_type(
        ty: &TypeRef,
        namespace: &str,
        self_name: &str,
        dependencies: &mut IndexSet<String>,
        synthetic: &mut SyntheticRequests,
    ) -> FieldType {
        match ty {
            TypeRef::Primitive(primitive) => {
                FieldType::Name(primitive.name().to_owned())
            }
            TypeRef::Named(full_name) => {
                // A self-reference is legal Avro and needs no ordering.
                if full_name != self_name {
                    dependencies.insert(full_name.clone());
                }
                FieldType::Name(full_name.clone())
            }
            TypeRef::Date => {
                Self::synthetic_type(SyntheticKind::Date, namespace, synthetic)
            }
            TypeRef::Reference => Self::synthetic_type(
                SyntheticKind::Reference,
                namespace,
                synthetic,
            ),
        }
    }

    fn synthetic_type(
        kind: SyntheticKind,
        namespace: &str,
        synthetic: &mut SyntheticRequests,
    ) -> FieldType {
        synthetic.request(kind, namespace);
        FieldType::Name(qualified_name(namespace, kind.name()))
    }

    fn field(
        info: &FieldInfo,
        namespace: &str,
        self_name: &str,
        dependencies: &mut IndexSet<String>,
        synthetic: &mut SyntheticRequests,
    ) -> Field {
        let ty = Self::field_type(
            &info.ty,
            namespace,
            self_name,
            dependencies,
            synthetic,
        );

        let (ty, default) = if info.repeated {
            (ty.array(), Some(EMPTY_ARRAY_DEFAULT))
        } else if info.optional {
            (ty.nullable(), Some(NULL_DEFAULT))
        } else {
            (ty, None)
        };

        Field {
            name: info.name.clone(),
            ty,
            doc: info.doc.clone(),
            default: default.map(|d| Value::String(d.to_owned())),
        }
    }
}

impl TypeMapper for AvroTypeMapper {
    fn map_class(
        &self,
        class: &ClassInfo,
        synthetic: &mut SyntheticRequests,
    ) -> NamedSchema {
        let self_name = qualified_name(&class.namespace, &class.name);
        let mut dependencies = IndexSet::new();

        let fields = class
            .fields
            .iter()
            .map(|info| {
                Self::field(
                    info,
                    &class.namespace,
                    &self_name,
                    &mut dependencies,
                    synthetic,
                )
            })
            .collect();

        NamedSchema::new(
            NamedType::Record(RecordType {
                name: class.name.clone(),
                namespace: class.namespace.clone(),
                doc: class.doc.clone(),
                fields,
            }),
            dependencies.into_iter().collect(),
        )
    }

    fn map_enum(&self, info: &EnumInfo) -> NamedSchema {
        NamedSchema::new(
            NamedType::Enum(EnumType {
                name: info.name.clone(),
                namespace: info.namespace.clone(),
                doc: info.doc.clone(),
                symbols: info.symbols.clone(),
            }),
            Vec::new(),
        )
    }
}

#[cfg(test)]
mod tests {
    use schemagen_schemas::{ComplexType, Primitive};

    use super::*;

    fn field(name: &str, ty: TypeRef) -> FieldInfo {
        FieldInfo {
            name: name.to_owned(),
            ty,
            optional: false,
            repeated: false,
            doc: None,
        }
    }

    fn class(name: &str, fields: Vec<FieldInfo>) -> ClassInfo {
        ClassInfo {
            name: name.to_owned(),
            namespace: "com.acme".to_owned(),
            doc: None,
            fields,
        }
    }

    fn record_fields(schema: &NamedSchema) -> &[Field] {
        match &schema.schema {
            NamedType::Record(record) => &record.fields,
            NamedType::Enum(_) => panic!("expected a record"),
        }
    }

    #[test]
    fn test_named_fields_become_dependencies() {
        let order = class(
            "Order",
            vec![
                field("status", TypeRef::Named("com.acme.Status".to_owned())),
                field("buyer", TypeRef::Named("com.acme.Party".to_owned())),
                field("seller", TypeRef::Named("com.acme.Party".to_owned())),
                field("id", TypeRef::Primitive(Primitive::String)),
            ],
        );

        let mut synthetic = SyntheticRequests::default();
        let schema = AvroTypeMapper.map_class(&order, &mut synthetic);

        assert_eq!(schema.full_name(), "com.acme.Order");
        assert_eq!(
            schema.dependencies,
            ["com.acme.Status", "com.acme.Party"]
        );
        assert!(synthetic.is_empty());
    }

    #[test]
    fn test_primitive_fields_keep_avro_names() {
        let primitives = [
            (Primitive::Boolean, "boolean"),
            (Primitive::Int, "int"),
            (Primitive::Long, "long"),
            (Primitive::Float, "float"),
            (Primitive::Double, "double"),
            (Primitive::Bytes, "bytes"),
            (Primitive::String, "string"),
        ];
        let fields = primitives
            .iter()
            .map(|&(p, name)| field(name, TypeRef::Primitive(p)))
            .collect();

        let mut synthetic = SyntheticRequests::default();
        let schema =
            AvroTypeMapper.map_class(&class("All", fields), &mut synthetic);

        for (field, (_, name)) in record_fields(&schema).iter().zip(primitives)
        {
            assert_eq!(field.ty, FieldType::Name(name.to_owned()));
        }
        assert!(schema.dependencies.is_empty());
        assert!(synthetic.is_empty());
    }

    #[test]
    fn test_self_reference_is_not_a_dependency() {
        let node = class(
            "Node",
            vec![field("next", TypeRef::Named("com.acme.Node".to_owned()))],
        );

        let mut synthetic = SyntheticRequests::default();
        let schema = AvroTypeMapper.map_class(&node, &mut synthetic);

        assert!(schema.dependencies.is_empty());
    }

    #[test]
    fn test_wrapper_fields_request_synthetics() {
        let order = class(
            "Order",
            vec![
                field("placed", TypeRef::Date),
                field("customer", TypeRef::Reference),
            ],
        );

        let mut synthetic = SyntheticRequests::default();
        let schema = AvroTypeMapper.map_class(&order, &mut synthetic);

        let fields = record_fields(&schema);
        assert_eq!(fields[0].ty, FieldType::Name("com.acme.Date".to_owned()));
        assert_eq!(
            fields[1].ty,
            FieldType::Name("com.acme.Reference".to_owned())
        );
        assert!(schema.dependencies.is_empty());
        assert!(synthetic.date.contains("com.acme"));
        assert!(synthetic.reference.contains("com.acme"));
    }

    #[test]
    fn test_repeated_and_optional_defaults() {
        let mut notes =
            field("notes", TypeRef::Primitive(Primitive::String));
        notes.repeated = true;
        notes.optional = true;
        let mut comment =
            field("comment", TypeRef::Primitive(Primitive::String));
        comment.optional = true;

        let mut synthetic = SyntheticRequests::default();
        let schema = AvroTypeMapper
            .map_class(&class("Order", vec![notes, comment]), &mut synthetic);
        let fields = record_fields(&schema);

        assert!(matches!(
            fields[0].ty,
            FieldType::Complex(ComplexType::Array { .. })
        ));
        assert_eq!(fields[0].default, Some(Value::String("[]".to_owned())));

        assert_eq!(
            fields[1].ty,
            FieldType::Name("string".to_owned()).nullable()
        );
        assert_eq!(fields[1].default, Some(Value::String("null".to_owned())));
    }

    #[test]
    fn test_map_model_collects_enums_and_classes() {
        let model = TypeModel {
            classes: vec![class("Order", vec![field("at", TypeRef::Date)])],
            enums: vec![EnumInfo {
                name: "Status".to_owned(),
                namespace: "com.acme".to_owned(),
                doc: None,
                symbols: vec!["OPEN".to_owned()],
            }],
        };

        let set = map_model(&model, &AvroTypeMapper);

        let names: Vec<_> = set.schemas.iter().map(NamedSchema::name).collect();
        assert_eq!(names, ["Status", "Order"]);
        assert_eq!(set.synthetic.len(), 1);
    }
}
