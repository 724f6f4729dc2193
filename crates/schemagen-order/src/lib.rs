//! Dependency ordering and numbered emission of named Avro definitions.
//!
//! This crate takes the definitions produced by type mapping and writes them
//! to disk in an order where every definition follows the definitions it
//! references. This is the second phase of the schemagen pipeline.
//!
//! ## Pipeline
//!
//! 1. [`filter_collisions`]: keep one definition per short name
//! 2. [`resolve()`]: topologically order the survivors, treating references
//!    to unknown names as satisfied
//! 3. [`inject_synthetic`]: prepend the requested wrapper definitions
//! 4. [`emit()`]: render each definition and write the ordered directory,
//!    the namespace directory, and the manifest
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use schemagen_order::{PipelineConfig, run};
//!
//! let input = std::fs::File::open("schemas.json").unwrap();
//! run(input, Path::new("generated"), &PipelineConfig::default()).unwrap();
//! ```

mod collision;
mod config;
mod emit;
mod error;
mod render;
mod resolve;
mod synthetic;

use std::io::Read;
use std::path::Path;

use schemagen_schemas::{NamedSchema, SchemaSet};
use tracing::debug_span;

pub use crate::collision::filter_collisions;
pub use crate::config::{CyclePolicy, EmitConfig, PipelineConfig};
pub use crate::emit::{
    EmitReport, EmittedSchema, emit, index_label, index_width,
};
#[doc(inline)]
pub use crate::error::OrderError;
use crate::error::OrderErrorKind;
pub use crate::render::{
    JsonRenderer, RenderError, SchemaRenderer, apply_substitutions,
};
pub use crate::resolve::resolve;
pub use crate::synthetic::inject_synthetic;

/// Produces the final emission order for a schema set.
///
/// Runs collision filtering, dependency resolution, and synthetic injection
/// without touching the filesystem.
///
/// # Errors
///
/// Returns an error satisfying [`OrderError::is_cycle`] only when `policy`
/// is [`CyclePolicy::FailFast`] and some definitions cannot be ordered.
pub fn order(
    set: SchemaSet,
    policy: CyclePolicy,
) -> Result<Vec<NamedSchema>, OrderError> {
    let SchemaSet { schemas, synthetic } = set;
    let unique = filter_collisions(schemas);
    let resolved = resolve(unique, policy)?;
    Ok(inject_synthetic(&synthetic, resolved))
}

/// Orders a schema set and writes it under `out_dir`.
///
/// # Errors
///
/// Returns [`OrderError`] if ordering fails (see [`order`]) or if
/// [`emit()`] fails.
pub fn generate(
    set: SchemaSet,
    renderer: &dyn SchemaRenderer,
    out_dir: &Path,
    config: &PipelineConfig,
) -> Result<EmitReport, OrderError> {
    let _span = debug_span!("generate").entered();

    let ordered = order(set, config.cycle_policy)?;
    emit(&ordered, renderer, out_dir, &config.emit)
}

/// Reads a JSON [`SchemaSet`] from `input` and writes it under `out_dir`
/// with the [`JsonRenderer`].
///
/// # Errors
///
/// Returns [`OrderError`] if:
/// - Reading from input fails ([`OrderError::is_io`])
/// - The input is not a valid schema set ([`OrderError::is_deserialization`])
/// - Ordering or emission fails (see [`generate`])
pub fn run(
    mut input: impl Read,
    out_dir: &Path,
    config: &PipelineConfig,
) -> Result<EmitReport, OrderError> {
    let _span = debug_span!("run").entered();

    let mut json = String::new();
    input.read_to_string(&mut json)?;
    let set: SchemaSet = serde_json::from_str(&json)
        .map_err(|e| OrderError::new(OrderErrorKind::Deserialization(e)))?;

    generate(set, &JsonRenderer, out_dir, config)
}
