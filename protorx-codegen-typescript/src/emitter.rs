use protorx_codegen::{Emitter, GlobalRegistry, builder::Indent, model::ServiceModel};

use crate::{
    ast::Import,
    client::client_file,
    code_file::CodeFile,
    meta::Manifest,
    server::server_file,
};

/// Default module of the transport runtime.
pub const DEFAULT_TRANSPORT: &str = "grpc";
/// Default module of the observable library.
pub const DEFAULT_OBSERVABLE: &str = "rxjs";
/// Default module holding the generated message types.
pub const DEFAULT_INCLUDE: &str = "../apis/proto";

/// Renders bindings for the node `grpc` runtime with `rxjs` observables.
///
/// # Example
///
/// ```ignore
/// let emitter = TypeScriptEmitter::new()
///     .include("./proto")
///     .with_indent(Indent::Tab);
/// let output = Generation::new(&roots).run(&emitter);
/// ```
#[derive(Debug, Clone)]
pub struct TypeScriptEmitter {
    transport: String,
    observable: String,
    include: String,
    indent: Indent,
}

impl Default for TypeScriptEmitter {
    fn default() -> Self {
        Self {
            transport: DEFAULT_TRANSPORT.to_string(),
            observable: DEFAULT_OBSERVABLE.to_string(),
            include: DEFAULT_INCLUDE.to_string(),
            indent: Indent::TYPESCRIPT,
        }
    }
}

impl TypeScriptEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Module imported as `grpc`.
    pub fn transport(mut self, module: impl Into<String>) -> Self {
        self.transport = module.into();
        self
    }

    /// Module providing `Observable`.
    pub fn observable(mut self, module: impl Into<String>) -> Self {
        self.observable = module.into();
        self
    }

    /// Module providing the generated message types.
    pub fn include(mut self, module: impl Into<String>) -> Self {
        self.include = module.into();
        self
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    /// Import of the collected types, `None` when nothing needs importing.
    fn types_import(&self, registry: &GlobalRegistry, interfaces: bool) -> Option<Import> {
        if registry.is_empty() {
            return None;
        }
        let containers = registry.top_level_namespaces();
        let mut names: Vec<String> = containers.iter().map(|ns| ns.to_string()).collect();
        for global in &registry.globals {
            // a message with nested types is already imported as a container
            if !containers.contains(global.as_str()) {
                names.push(global.clone());
            }
            if interfaces {
                names.push(format!("I{}", global));
            }
        }
        Some(Import::new(&self.include).names(names))
    }
}

impl Emitter for TypeScriptEmitter {
    fn language(&self) -> &'static str {
        "typescript"
    }

    fn bindings_header(&self, registry: &GlobalRegistry) -> String {
        CodeFile::new()
            .import(Import::new(&self.transport).namespace("grpc"))
            .import(Import::new(&self.observable).named("Observable"))
            .imports(self.types_import(registry, true))
            .render_with_indent(self.indent)
    }

    fn client(&self, service: &ServiceModel) -> String {
        client_file(service).render_with_indent(self.indent)
    }

    fn server(&self, service: &ServiceModel) -> String {
        server_file(service).render_with_indent(self.indent)
    }

    fn meta_header(&self, registry: &GlobalRegistry) -> String {
        CodeFile::new()
            .imports(self.types_import(registry, false))
            .render_with_indent(self.indent)
    }

    fn meta_body(&self, services: &[ServiceModel]) -> String {
        CodeFile::new()
            .add(Manifest::new(services))
            .render_with_indent(self.indent)
    }
}
