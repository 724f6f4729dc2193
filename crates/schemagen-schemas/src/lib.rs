//! Schema definitions shared across the schemagen pipeline.
//!
//! This crate contains the data structures that flow between the phases of
//! schema generation:
//!
//! - [`TypeModel`]: the typed object model (classes and enums) that the
//!   type mapper consumes.
//! - [`NamedSchema`]: one named Avro definition (record or enum) plus the
//!   fully-qualified names of the definitions it references.
//! - [`SyntheticRequests`]: the per-run record of which built-in wrapper
//!   definitions were requested in which namespaces.
//! - [`SchemaSet`]: the mapped definitions and synthetic requests together,
//!   which is the input of the ordering and emission phase.
//!
//! All types serialize to JSON so each phase can be run on its own from the
//! command line.

mod named_schema;
mod synthetic;
#[cfg(test)]
mod testutil;
mod type_model;

#[doc(inline)]
pub use named_schema::*;
#[doc(inline)]
pub use synthetic::*;
#[doc(inline)]
pub use type_model::*;
