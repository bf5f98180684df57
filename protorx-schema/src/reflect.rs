//! In-memory reflection tree of a loaded schema.
//!
//! A [`Root`] owns a tree of [`Node`]s keyed by name in declaration order.
//! Fully-qualified names start with the root anchor (`.pkg.Msg`); the root
//! itself has the empty name.

use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};

/// Ordered children of a namespace or message type.
pub type Nested = IndexMap<String, Node>;

fn join(parent: &str, name: &str) -> String {
    format!("{}.{}", parent, name)
}

/// A node of the reflection tree.
#[derive(Debug, Clone)]
pub enum Node {
    Namespace(Namespace),
    Type(MessageType),
    Enum(EnumType),
    Service(Service),
}

impl Node {
    pub fn name(&self) -> &str {
        match self {
            Node::Namespace(n) => &n.name,
            Node::Type(t) => &t.name,
            Node::Enum(e) => &e.name,
            Node::Service(s) => &s.name,
        }
    }

    pub fn full_name(&self) -> &str {
        match self {
            Node::Namespace(n) => &n.full_name,
            Node::Type(t) => &t.full_name,
            Node::Enum(e) => &e.full_name,
            Node::Service(s) => &s.full_name,
        }
    }

    /// Children of this node, if it can hold any.
    pub fn nested(&self) -> Option<&Nested> {
        match self {
            Node::Namespace(n) => Some(&n.nested),
            Node::Type(t) => Some(&t.nested),
            Node::Enum(_) | Node::Service(_) => None,
        }
    }

    fn nested_mut(&mut self) -> Option<&mut Nested> {
        match self {
            Node::Namespace(n) => Some(&mut n.nested),
            Node::Type(t) => Some(&mut t.nested),
            Node::Enum(_) | Node::Service(_) => None,
        }
    }

    pub fn as_service(&self) -> Option<&Service> {
        match self {
            Node::Service(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_namespace(&self) -> bool {
        matches!(self, Node::Namespace(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Node::Namespace(_) => "namespace",
            Node::Type(_) => "message",
            Node::Enum(_) => "enum",
            Node::Service(_) => "service",
        }
    }
}

/// A package namespace.
#[derive(Debug, Clone)]
pub struct Namespace {
    pub name: String,
    pub full_name: String,
    pub nested: Nested,
}

impl Namespace {
    fn root() -> Self {
        Self {
            name: String::new(),
            full_name: String::new(),
            nested: Nested::new(),
        }
    }

    pub fn new(name: impl Into<String>, parent: &str) -> Self {
        let name = name.into();
        Self {
            full_name: join(parent, &name),
            name,
            nested: Nested::new(),
        }
    }
}

/// A message type. Fields are not modelled; nested declarations are.
#[derive(Debug, Clone)]
pub struct MessageType {
    pub name: String,
    pub full_name: String,
    pub nested: Nested,
}

impl MessageType {
    pub fn new(name: impl Into<String>, parent: &str) -> Self {
        let name = name.into();
        Self {
            full_name: join(parent, &name),
            name,
            nested: Nested::new(),
        }
    }
}

/// An enum type. Only its name matters to the generator.
#[derive(Debug, Clone)]
pub struct EnumType {
    pub name: String,
    pub full_name: String,
}

impl EnumType {
    pub fn new(name: impl Into<String>, parent: &str) -> Self {
        let name = name.into();
        Self {
            full_name: join(parent, &name),
            name,
        }
    }
}

/// An RPC service with its methods in declaration order.
#[derive(Debug, Clone)]
pub struct Service {
    pub name: String,
    pub full_name: String,
    pub methods: Vec<Method>,
}

impl Service {
    pub fn new(name: impl Into<String>, parent: &str) -> Self {
        let name = name.into();
        Self {
            full_name: join(parent, &name),
            name,
            methods: Vec::new(),
        }
    }

    /// Append a method declared as `rpc name(request) returns (response)`.
    pub fn add_method(
        &mut self,
        name: impl Into<String>,
        request_type: impl Into<String>,
        request_stream: bool,
        response_type: impl Into<String>,
        response_stream: bool,
    ) -> &mut Method {
        let name = name.into();
        self.methods.push(Method {
            full_name: join(&self.full_name, &name),
            name,
            request_type: request_type.into(),
            response_type: response_type.into(),
            request_stream,
            response_stream,
            resolved_request: None,
            resolved_response: None,
        });
        let last = self.methods.len() - 1;
        &mut self.methods[last]
    }

    /// Full name of the namespace the service is declared in.
    pub fn parent_name(&self) -> &str {
        match self.full_name.rfind('.') {
            Some(idx) => &self.full_name[..idx],
            None => "",
        }
    }
}

/// An RPC method.
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    pub full_name: String,
    /// Request type name as written in the schema.
    pub request_type: String,
    /// Response type name as written in the schema.
    pub response_type: String,
    pub request_stream: bool,
    pub response_stream: bool,
    pub resolved_request: Option<TypeRef>,
    pub resolved_response: Option<TypeRef>,
}

impl Method {
    /// Both message types, when both resolved.
    pub fn resolved(&self) -> Option<(&TypeRef, &TypeRef)> {
        match (&self.resolved_request, &self.resolved_response) {
            (Some(req), Some(res)) => Some((req, res)),
            _ => None,
        }
    }
}

/// Reference to a resolved message type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: String,
    pub full_name: String,
}

impl TypeRef {
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let name = match full_name.rfind('.') {
            Some(idx) => full_name[idx + 1..].to_string(),
            None => full_name.clone(),
        };
        Self { name, full_name }
    }

    /// Whether the type is declared directly under the root (no package).
    pub fn is_root_level(&self) -> bool {
        self.full_name.rfind('.') == Some(0)
    }
}

/// Error raised when a declaration collides with an existing name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateName(pub String);

/// A schema root: everything loaded from one entry file and its imports.
#[derive(Debug, Clone)]
pub struct Root {
    files: Vec<PathBuf>,
    namespace: Namespace,
}

impl Default for Root {
    fn default() -> Self {
        Self::new()
    }
}

impl Root {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            namespace: Namespace::root(),
        }
    }

    /// The anonymous root namespace.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Files merged into this root, entry file first.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub(crate) fn has_file(&self, path: &Path) -> bool {
        self.files.iter().any(|f| f == path)
    }

    pub(crate) fn add_file(&mut self, path: impl Into<PathBuf>) {
        self.files.push(path.into());
    }

    /// Find a node by fully-qualified name.
    pub fn get(&self, full_name: &str) -> Option<&Node> {
        let mut segments = full_name.strip_prefix('.')?.split('.');
        let mut node = self.namespace.nested.get(segments.next()?)?;
        for segment in segments {
            node = node.nested()?.get(segment)?;
        }
        Some(node)
    }

    /// Get or create the chain of namespaces named by `path` (e.g. `["foo", "bar"]`).
    ///
    /// Returns the children of the innermost namespace together with its full name.
    /// Descending into an existing message type is allowed, as protobuf permits
    /// `package` paths that coincide with message scopes.
    pub fn define_namespace(
        &mut self,
        path: &[&str],
    ) -> std::result::Result<(&mut Nested, String), DuplicateName> {
        let mut full_name = String::new();
        let mut nested = &mut self.namespace.nested;
        for segment in path {
            let child_full = join(&full_name, segment);
            let node = nested
                .entry(segment.to_string())
                .or_insert_with(|| Node::Namespace(Namespace::new(*segment, &full_name)));
            nested = match node.nested_mut() {
                Some(children) => children,
                None => return Err(DuplicateName(child_full)),
            };
            full_name = child_full;
        }
        Ok((nested, full_name))
    }

    /// Resolve every method's request and response type.
    ///
    /// Absolute names (`.pkg.Msg`) are looked up from the root; relative names
    /// are looked up from the service's enclosing namespace outward. Only message
    /// types resolve: a name that is missing or names an enum stays unresolved.
    ///
    /// Returns the number of methods left with at least one unresolved type.
    pub fn resolve_all(&mut self) -> usize {
        let mut types = IndexSet::new();
        collect_types(&self.namespace.nested, &mut types);

        let mut unresolved = 0;
        resolve_services(&mut self.namespace.nested, &types, &mut unresolved);
        unresolved
    }
}

fn collect_types(nested: &Nested, types: &mut IndexSet<String>) {
    for node in nested.values() {
        if let Node::Type(t) = node {
            types.insert(t.full_name.clone());
        }
        if let Some(children) = node.nested() {
            collect_types(children, types);
        }
    }
}

fn resolve_services(nested: &mut Nested, types: &IndexSet<String>, unresolved: &mut usize) {
    for node in nested.values_mut() {
        match node {
            Node::Service(service) => {
                let scope = service.parent_name().to_string();
                for method in &mut service.methods {
                    method.resolved_request = lookup_type(types, &scope, &method.request_type);
                    method.resolved_response = lookup_type(types, &scope, &method.response_type);
                    if method.resolved().is_none() {
                        *unresolved += 1;
                    }
                }
            }
            other => {
                if let Some(children) = other.nested_mut() {
                    resolve_services(children, types, unresolved);
                }
            }
        }
    }
}

/// Look `name` up from `scope` outward to the root.
fn lookup_type(types: &IndexSet<String>, scope: &str, name: &str) -> Option<TypeRef> {
    if name.starts_with('.') {
        return types.contains(name).then(|| TypeRef::new(name));
    }

    let mut scope = scope;
    loop {
        let candidate = join(scope, name);
        if types.contains(&candidate) {
            return Some(TypeRef::new(candidate));
        }
        if scope.is_empty() {
            return None;
        }
        scope = match scope.rfind('.') {
            Some(idx) => &scope[..idx],
            None => "",
        };
    }
}
