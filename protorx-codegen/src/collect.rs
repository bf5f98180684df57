//! Namespaces and root-level types referenced by the generated code.

use indexmap::IndexSet;
use protorx_schema::{Nested, Node, Root};

/// Names the generated files import from the message-type module.
///
/// Accumulated over every root before any generation starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalRegistry {
    /// Dotted paths of namespaces and message types that have children
    /// (`foo`, `foo.bar`, `Outer`).
    pub namespaces: IndexSet<String>,
    /// Leaf names of package-less message types used by a fully resolved method.
    pub globals: IndexSet<String>,
}

impl GlobalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry over all `roots`.
    pub fn collect(roots: &[Root]) -> Self {
        let mut registry = Self::new();
        for root in roots {
            registry.add_root(root);
        }
        registry
    }

    /// Add everything `root` contributes.
    pub fn add_root(&mut self, root: &Root) {
        self.visit(&root.namespace().nested, &mut Vec::new());
    }

    /// Distinct first segments of the namespace paths, i.e. the top-level
    /// containers an import statement can name.
    pub fn top_level_namespaces(&self) -> IndexSet<&str> {
        self.namespaces
            .iter()
            .map(|ns| ns.split('.').next().unwrap_or(ns))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty() && self.globals.is_empty()
    }

    fn visit<'a>(&mut self, nested: &'a Nested, path: &mut Vec<&'a str>) {
        for node in nested.values() {
            match node {
                Node::Namespace(ns) => {
                    path.push(&ns.name);
                    if !ns.nested.is_empty() {
                        self.namespaces.insert(path.join("."));
                    }
                    self.visit(&ns.nested, path);
                    path.pop();
                }
                Node::Type(t) => {
                    path.push(&t.name);
                    // nested types are reached through their parent message
                    if !t.nested.is_empty() {
                        self.namespaces.insert(path.join("."));
                    }
                    self.visit(&t.nested, path);
                    path.pop();
                }
                Node::Service(service) => {
                    for method in &service.methods {
                        let Some((req, res)) = method.resolved() else {
                            continue;
                        };
                        for t in [req, res] {
                            if t.is_root_level() {
                                self.globals.insert(t.name.clone());
                            }
                        }
                    }
                }
                Node::Enum(_) => {}
            }
        }
    }
}
