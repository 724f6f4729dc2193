//! Shared proptest strategies for schema tests.

use proptest::prelude::*;

/// Strategy for generating arbitrary Avro-style short names.
pub fn arb_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Za-z0-9_]{0,11}"
}

/// Strategy for generating dotted namespaces (e.g., `com.acme.orders`).
pub fn arb_namespace() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z][a-z0-9]{0,7}", 1..4)
        .prop_map(|segments| segments.join("."))
}
