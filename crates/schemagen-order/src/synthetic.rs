//! Prepends the requested synthetic wrapper definitions.

use std::collections::HashSet;

use schemagen_schemas::{NamedSchema, SyntheticKind, SyntheticRequests};
use tracing::{debug, info};

/// Places the synthetic definitions in front of the resolved sequence.
///
/// Final order: every requested date wrapper, then every requested
/// reference wrapper, then `resolved`. Within each kind, namespaces follow
/// the sorted order of `requests`. Synthetic definitions skip collision
/// filtering and sorting; they have no dependencies of their own.
///
/// A resolved definition whose fully-qualified name matches an injected
/// wrapper is dropped. Fields typed as the wrapper already refer to that
/// name, and the wrapper sits ahead of everything that could depend on it.
pub fn inject_synthetic(
    requests: &SyntheticRequests,
    resolved: Vec<NamedSchema>,
) -> Vec<NamedSchema> {
    if requests.is_empty() {
        return resolved;
    }

    let mut sequence = Vec::with_capacity(requests.len() + resolved.len());
    for kind in [SyntheticKind::Date, SyntheticKind::Reference] {
        sequence.extend(
            requests
                .namespaces(kind)
                .map(|namespace| kind.schema(namespace)),
        );
    }
    debug!(count = sequence.len(), "injected synthetic definitions");

    let injected: HashSet<String> =
        sequence.iter().map(NamedSchema::full_name).collect();
    sequence.extend(resolved.into_iter().filter(|schema| {
        let full_name = schema.full_name();
        let shadowed = injected.contains(&full_name);
        if shadowed {
            info!(
                schema = %full_name,
                "definition shadowed by synthetic wrapper, dropping it"
            );
        }
        !shadowed
    }));
    sequence
}
