//! Numbered, ordered emission of rendered definitions.
//!
//! Each definition is written twice:
//!
//! - flat into the ordered directory as `{index}_{name}.{ext}`, where
//!   `index` is the 1-based position zero-padded to the width of the total
//!   count, so a plain filename sort reproduces the dependency order;
//! - into the namespace directory as `{ns/as/path}/{name}.{ext}`.
//!
//! A manifest holding every rendered definition, concatenated in order with
//! no separators, is written alongside.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use schemagen_schemas::NamedSchema;
use tracing::{debug, debug_span, info};

use crate::config::EmitConfig;
use crate::error::{OrderError, OrderErrorKind};
use crate::render::SchemaRenderer;

/// One definition as written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedSchema {
    /// Zero-padded 1-based position, e.g. `"007"`.
    pub label: String,
    pub name: String,
    pub namespace: String,
    pub ordered_path: PathBuf,
    pub namespace_path: PathBuf,
}

/// Summary of one emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitReport {
    /// Entries in emission order.
    pub entries: Vec<EmittedSchema>,
    pub manifest_path: PathBuf,
}

/// Number of decimal digits needed to print `count` (at least 1).
pub fn index_width(count: usize) -> usize {
    count.to_string().len()
}

/// Left-pads `index` with zeros to `width` digits.
pub fn index_label(index: usize, width: usize) -> String {
    format!("{index:0width$}")
}

/// Renders and writes `schemas` in the given order.
///
/// Every name is checked and every definition rendered before anything is
/// written, so either failure leaves the output directory untouched. Per-definition files are
/// written in parallel; the manifest is assembled in order.
///
/// # Errors
///
/// Returns [`OrderError`] if:
/// - A name or namespace segment is not a plain file name
///   ([`OrderError::is_invalid_name`])
/// - Any definition fails to render ([`OrderError::is_serialization`])
/// - Creating a directory or writing a file fails ([`OrderError::is_io`])
pub fn emit(
    schemas: &[NamedSchema],
    renderer: &dyn SchemaRenderer,
    out_dir: &Path,
    config: &EmitConfig,
) -> Result<EmitReport, OrderError> {
    let _span = debug_span!("emit", schemas = schemas.len()).entered();

    info!(
        ordered = %config.ordered_dir.display(),
        namespaced = %config.namespace_dir.display(),
        "writing schemas under {}",
        out_dir.display()
    );

    for schema in schemas {
        if let Some(segment) =
            EmitConfig::unsafe_component(schema.namespace(), schema.name())
        {
            return Err(OrderError::new(OrderErrorKind::InvalidName {
                schema: schema.full_name(),
                segment: segment.to_owned(),
            }));
        }
    }

    let rendered = schemas
        .iter()
        .map(|schema| {
            renderer.render(schema).map_err(|source| {
                OrderError::new(OrderErrorKind::Serialization {
                    schema: schema.full_name(),
                    source,
                })
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let width = index_width(schemas.len());
    let entries: Vec<EmittedSchema> = schemas
        .iter()
        .enumerate()
        .map(|(i, schema)| {
            let label = index_label(i + 1, width);
            EmittedSchema {
                ordered_path: config.ordered_path(
                    out_dir,
                    &label,
                    schema.name(),
                ),
                namespace_path: config.namespace_path(
                    out_dir,
                    schema.namespace(),
                    schema.name(),
                ),
                label,
                name: schema.name().to_owned(),
                namespace: schema.namespace().to_owned(),
            }
        })
        .collect();

    fs::create_dir_all(out_dir.join(&config.ordered_dir))?;
    entries
        .par_iter()
        .zip(&rendered)
        .try_for_each(|(entry, text)| write_entry(entry, text))?;

    let manifest_path = config.manifest_path(out_dir);
    if let Some(parent) = manifest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&manifest_path, rendered.concat())?;

    debug!(count = entries.len(), "wrote schemas and manifest");
    Ok(EmitReport {
        entries,
        manifest_path,
    })
}

fn write_entry(entry: &EmittedSchema, text: &str) -> std::io::Result<()> {
    fs::write(&entry.ordered_path, text)?;
    if let Some(parent) = entry.namespace_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&entry.namespace_path, text)
}
