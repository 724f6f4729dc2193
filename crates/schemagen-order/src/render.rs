//! Rendering definitions to their textual schema form.
//!
//! The emitter only sees the [`SchemaRenderer`] trait. [`JsonRenderer`]
//! pretty-prints the Avro body with `serde_json` and then applies two fixed
//! textual substitutions:
//!
//! | placeholder          | replacement        |
//! |----------------------|--------------------|
//! | `"[]"`               | `[]`               |
//! | `"default": "null"`  | `"default": null`  |
//!
//! The type mapper writes these placeholder strings for empty-list and
//! absent-value defaults. Any other renderer must apply the same
//! substitutions to produce byte-identical output.

use schemagen_schemas::NamedSchema;

/// Cause of a failed render, kept as the source of the resulting
/// [`OrderError`](crate::OrderError).
pub type RenderError = Box<dyn std::error::Error + Send + Sync>;

/// Quoted empty-array placeholder as it appears in rendered text.
const EMPTY_ARRAY_PLACEHOLDER: &str = "\"[]\"";
const EMPTY_ARRAY_LITERAL: &str = "[]";

/// Quoted null-default placeholder as it appears in rendered text.
const NULL_DEFAULT_PLACEHOLDER: &str = "\"default\": \"null\"";
const NULL_DEFAULT_LITERAL: &str = "\"default\": null";

/// Turns one definition into text.
pub trait SchemaRenderer {
    /// Renders the body of `schema`.
    ///
    /// # Errors
    ///
    /// Any error aborts the whole emission.
    fn render(&self, schema: &NamedSchema) -> Result<String, RenderError>;
}

/// Pretty-printed JSON renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl SchemaRenderer for JsonRenderer {
    fn render(&self, schema: &NamedSchema) -> Result<String, RenderError> {
        let json = serde_json::to_string_pretty(&schema.schema)?;
        Ok(apply_substitutions(&json))
    }
}

/// Replaces the placeholder literals with real JSON literals.
///
/// Idempotent: the replacements never contain a placeholder.
pub fn apply_substitutions(text: &str) -> String {
    text.replace(EMPTY_ARRAY_PLACEHOLDER, EMPTY_ARRAY_LITERAL)
        .replace(NULL_DEFAULT_PLACEHOLDER, NULL_DEFAULT_LITERAL)
}
