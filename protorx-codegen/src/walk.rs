//! Depth-first traversal of schema roots.

use indexmap::IndexSet;
use protorx_schema::{Nested, Node, Root, Service};

use crate::model::GeneratorKind;

/// Fully-qualified names one generator has already seen during a run.
///
/// Created once per generator kind per run and threaded through every
/// [`walk`] call so a service reachable from several roots is emitted once.
#[derive(Debug, Clone)]
pub struct Visited {
    kind: GeneratorKind,
    seen: IndexSet<String>,
}

impl Visited {
    pub fn new(kind: GeneratorKind) -> Self {
        Self {
            kind,
            seen: IndexSet::new(),
        }
    }

    pub fn kind(&self) -> GeneratorKind {
        self.kind
    }

    /// Record `full_name`. Returns `false` if it was already recorded.
    pub fn insert(&mut self, full_name: &str) -> bool {
        if self.seen.contains(full_name) {
            return false;
        }
        self.seen.insert(full_name.to_string())
    }

    pub fn contains(&self, full_name: &str) -> bool {
        self.seen.contains(full_name)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

/// Walk `root` depth-first and call `visit` for every service not yet in `visited`.
///
/// Children are visited in declaration order before their parent. Every node's
/// full name is recorded, but only services are handed to `visit`.
pub fn walk<'a, F>(root: &'a Root, visited: &mut Visited, mut visit: F)
where
    F: FnMut(&'a Service),
{
    walk_nested(&root.namespace().nested, visited, &mut visit);
}

fn walk_nested<'a, F>(nested: &'a Nested, visited: &mut Visited, visit: &mut F)
where
    F: FnMut(&'a Service),
{
    for node in nested.values() {
        walk_node(node, visited, visit);
    }
}

fn walk_node<'a, F>(node: &'a Node, visited: &mut Visited, visit: &mut F)
where
    F: FnMut(&'a Service),
{
    if let Some(children) = node.nested() {
        walk_nested(children, visited, visit);
    }

    if !visited.insert(node.full_name()) {
        return;
    }
    if let Some(service) = node.as_service() {
        visit(service);
    }
}
