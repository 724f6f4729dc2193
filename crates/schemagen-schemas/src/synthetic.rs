//! Built-in wrapper definitions supplied at generation time.
//!
//! Some field types in the object model (timestamps, references to other
//! objects by id) have no direct Avro counterpart. The mapper points such
//! fields at a small wrapper record in the field's own namespace and records
//! the request in [`SyntheticRequests`]. After ordering, each requested
//! wrapper is materialized once per namespace and placed ahead of all mapped
//! definitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Field, FieldType, NamedSchema, NamedType, RecordType};

/// The fixed catalog of synthetic definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SyntheticKind {
    /// Date/time wrapper: `{ time: long }`, epoch milliseconds.
    Date,
    /// Cross-reference wrapper: `{ id: string }`.
    Reference,
}

impl SyntheticKind {
    /// Short name of the wrapper record.
    pub fn name(self) -> &'static str {
        match self {
            SyntheticKind::Date => "Date",
            SyntheticKind::Reference => "Reference",
        }
    }

    /// Materializes the wrapper record for one namespace.
    ///
    /// Synthetic definitions never have dependencies.
    pub fn schema(self, namespace: &str) -> NamedSchema {
        let (field, ty, doc) = match self {
            SyntheticKind::Date => {
                ("time", "long", "Milliseconds since the Unix epoch.")
            }
            SyntheticKind::Reference => {
                ("id", "string", "Identifier of the referenced object.")
            }
        };

        NamedSchema::new(
            NamedType::Record(RecordType {
                name: self.name().to_owned(),
                namespace: namespace.to_owned(),
                doc: None,
                fields: vec![Field {
                    name: field.to_owned(),
                    ty: FieldType::Name(ty.to_owned()),
                    doc: Some(doc.to_owned()),
                    default: None,
                }],
            }),
            Vec::new(),
        )
    }
}

/// Which synthetic definitions were requested in which namespaces.
///
/// One instance is threaded through the mapper for a single run and read
/// by the injector afterwards. Namespaces are kept sorted so that the
/// injected prefix is the same on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticRequests {
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub date: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub reference: BTreeSet<String>,
}

impl SyntheticRequests {
    /// Records that `kind` is needed in `namespace`.
    ///
    /// Repeated requests for the same pair are collapsed.
    pub fn request(&mut self, kind: SyntheticKind, namespace: &str) {
        let namespaces = match kind {
            SyntheticKind::Date => &mut self.date,
            SyntheticKind::Reference => &mut self.reference,
        };
        if !namespaces.contains(namespace) {
            namespaces.insert(namespace.to_owned());
        }
    }

    /// Namespaces in which `kind` was requested, in sorted order.
    pub fn namespaces(
        &self,
        kind: SyntheticKind,
    ) -> impl Iterator<Item = &str> {
        match kind {
            SyntheticKind::Date => self.date.iter(),
            SyntheticKind::Reference => self.reference.iter(),
        }
        .map(String::as_str)
    }

    /// Returns true if nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.date.is_empty() && self.reference.is_empty()
    }

    /// Total number of (kind, namespace) pairs requested.
    pub fn len(&self) -> usize {
        self.date.len() + self.reference.len()
    }
}
