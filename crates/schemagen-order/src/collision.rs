//! Short-name collision filtering.
//!
//! Collisions are detected on the short name alone, across all namespaces.
//! The first definition seen for each name wins.

use std::collections::HashSet;

use schemagen_schemas::NamedSchema;
use tracing::info;

/// Keeps the first definition for each short name and drops the rest.
///
/// Duplicates are a tolerated condition: each dropped definition is logged
/// and the run continues.
pub fn filter_collisions(schemas: Vec<NamedSchema>) -> Vec<NamedSchema> {
    let mut seen: HashSet<String> = HashSet::with_capacity(schemas.len());

    schemas
        .into_iter()
        .filter(|schema| {
            if seen.contains(schema.name()) {
                info!(
                    name = schema.name(),
                    namespace = schema.namespace(),
                    "duplicate type name found, dropping definition"
                );
                false
            } else {
                seen.insert(schema.name().to_owned());
                true
            }
        })
        .collect()
}
