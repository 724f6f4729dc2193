//! Dependency graph construction and topological ordering.
//!
//! Every definition becomes a node keyed by its fully-qualified name. A
//! dependency on a name that has not been seen yet creates a *stub* node; if
//! the real definition turns up later it is attached to the stub. Stubs that
//! never receive a definition still take part in ordering (they are ready
//! immediately, since nothing gives them parents) but are never emitted.
//!
//! Nodes live in an `IndexMap` arena. Parent and child relations are stored
//! as sets of keys, so the graph has no owning references between nodes.
//!
//! ## Algorithm
//!
//! Kahn's algorithm: nodes with no remaining parents are consumed in
//! first-insertion order; consuming a node appends its definition (if any)
//! and removes it from each child's parent set. Nodes whose parent set never
//! empties sit on or behind a dependency cycle. [`CyclePolicy`] decides
//! whether they are dropped or reported.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use schemagen_schemas::NamedSchema;
use tracing::{debug, debug_span};

use crate::config::CyclePolicy;
use crate::error::{OrderError, OrderErrorKind};

/// Orders definitions so that each follows everything it depends on.
///
/// The result contains exactly the supplied definitions that could be
/// ordered. Dependencies on names that were never supplied are treated as
/// satisfied.
///
/// # Errors
///
/// Returns an error satisfying [`OrderError::is_cycle`] if some definitions
/// could not be ordered and `policy` is [`CyclePolicy::FailFast`].
pub fn resolve(
    schemas: Vec<NamedSchema>,
    policy: CyclePolicy,
) -> Result<Vec<NamedSchema>, OrderError> {
    let _span = debug_span!("resolve", schemas = schemas.len()).entered();

    let graph = DependencyGraph::build(schemas);
    debug!(nodes = graph.nodes.len(), "built dependency graph");
    graph.into_order(policy)
}

/// A graph node: zero or one definition plus its relations.
#[derive(Debug, Default)]
struct Node {
    /// `None` for a stub.
    schema: Option<NamedSchema>,
    /// Keys of the nodes this node depends on and must follow.
    parents: IndexSet<String>,
    /// Keys of the nodes that depend on this node.
    children: IndexSet<String>,
}

/// Arena of nodes keyed by fully-qualified name.
#[derive(Debug, Default)]
struct DependencyGraph {
    nodes: IndexMap<String, Node>,
}

impl DependencyGraph {
    fn build(schemas: Vec<NamedSchema>) -> Self {
        let mut graph = DependencyGraph::default();
        for schema in schemas {
            graph.insert(schema);
        }
        graph
    }

    /// Adds one definition, filling its stub if one exists.
    fn insert(&mut self, schema: NamedSchema) {
        let key = schema.full_name();
        let dependencies = schema.dependencies.clone();

        let node = self.nodes.entry(key.clone()).or_default();
        if node.schema.is_some() {
            debug!(name = %key, "definition supplied twice, keeping the first");
            return;
        }
        node.schema = Some(schema);

        for dependency in dependencies {
            // A definition may refer to itself; that never constrains order.
            if dependency == key {
                continue;
            }
            self.nodes
                .entry(dependency.clone())
                .or_default()
                .children
                .insert(key.clone());
            self.nodes
                .get_mut(&key)
                .expect("node was inserted above")
                .parents
                .insert(dependency);
        }
    }

    /// Consumes the graph, producing the dependency-respecting sequence.
    fn into_order(
        mut self,
        policy: CyclePolicy,
    ) -> Result<Vec<NamedSchema>, OrderError> {
        let mut ready: VecDeque<usize> = self
            .nodes
            .values()
            .enumerate()
            .filter(|(_, node)| node.parents.is_empty())
            .map(|(index, _)| index)
            .collect();
        let mut sequence = Vec::with_capacity(self.nodes.len());

        while let Some(index) = ready.pop_front() {
            let (key, node) = self
                .nodes
                .get_index_mut(index)
                .expect("ready indices come from the arena");
            let key = key.clone();

            // Stubs have nothing to emit.
            if let Some(schema) = node.schema.take() {
                sequence.push(schema);
            }

            for child in std::mem::take(&mut node.children) {
                let (child_index, _, child_node) = self
                    .nodes
                    .get_full_mut(&child)
                    .expect("children are always registered");
                child_node.parents.swap_remove(&key);
                if child_node.parents.is_empty() {
                    ready.push_back(child_index);
                }
            }
        }

        let stranded: Vec<&str> = self
            .nodes
            .iter()
            .filter(|(_, node)| !node.parents.is_empty())
            .map(|(key, _)| key.as_str())
            .collect();

        if !stranded.is_empty() {
            match policy {
                CyclePolicy::Drop => {
                    debug!(
                        count = stranded.len(),
                        names = ?stranded,
                        "dropping definitions that could not be ordered"
                    );
                }
                CyclePolicy::FailFast => {
                    let cycles = self.cycles(&stranded);
                    return Err(OrderError::new(OrderErrorKind::Cycle(cycles)));
                }
            }
        }

        Ok(sequence)
    }

    /// Finds the cycles among nodes that never became ready.
    ///
    /// Stranded nodes that merely depend on a cycle are not part of any
    /// reported cycle. Names within a cycle, and the cycles themselves, are
    /// sorted.
    fn cycles(&self, stranded: &[&str]) -> Vec<Vec<String>> {
        let mut graph = DiGraph::<&str, ()>::new();
        let indices: IndexMap<&str, _> = stranded
            .iter()
            .map(|&key| (key, graph.add_node(key)))
            .collect();

        for (&key, &to) in &indices {
            for parent in &self.nodes[key].parents {
                if let Some(&from) = indices.get(parent.as_str()) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| {
                let mut names: Vec<String> = component
                    .into_iter()
                    .map(|index| String::from(graph[index]))
                    .collect();
                names.sort_unstable();
                names
            })
            .collect();
        cycles.sort_unstable();
        cycles
    }
}
