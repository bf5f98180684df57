//! TypeScript import builder.

use protorx_codegen::builder::{CodeBuilder, CodeFragment, Renderable};

/// Builder for TypeScript import statements.
#[derive(Debug, Clone)]
pub struct Import {
    from: String,
    namespace: Option<String>,
    named: Vec<String>,
}

impl Import {
    pub fn new(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            namespace: None,
            named: Vec::new(),
        }
    }

    /// Import the whole module under one name (`import * as name`).
    pub fn namespace(mut self, name: impl Into<String>) -> Self {
        self.namespace = Some(name.into());
        self
    }

    /// Import a named export.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.named.push(name.into());
        self
    }

    /// Import several named exports.
    pub fn names(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.named.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.namespace.is_none() && self.named.is_empty()
    }

    fn statement(&self) -> String {
        match (&self.namespace, self.named.is_empty()) {
            (Some(ns), _) => format!("import * as {} from \"{}\";", ns, self.from),
            (None, false) => format!(
                "import {{ {} }} from \"{}\";",
                self.named.join(", "),
                self.from
            ),
            (None, true) => format!("import \"{}\";", self.from),
        }
    }

    /// Render the import to a CodeBuilder.
    pub fn render(&self, builder: CodeBuilder) -> CodeBuilder {
        builder.line(&self.statement())
    }

    /// Build the import as a string.
    pub fn build(&self) -> String {
        self.render(CodeBuilder::typescript()).build()
    }
}

impl Renderable for Import {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![CodeFragment::Line(self.statement())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_import() {
        let i = Import::new("grpc").namespace("grpc").build();
        assert_eq!(i, "import * as grpc from \"grpc\";\n");
    }

    #[test]
    fn test_named_import() {
        let i = Import::new("rxjs").named("Observable").build();
        assert_eq!(i, "import { Observable } from \"rxjs\";\n");
    }

    #[test]
    fn test_names_extend_in_order() {
        let i = Import::new("../apis/proto")
            .named("foo")
            .names(["Ping", "IPing"])
            .build();
        assert_eq!(i, "import { foo, Ping, IPing } from \"../apis/proto\";\n");
    }

    #[test]
    fn test_side_effect_import() {
        let i = Import::new("./polyfill");
        assert!(i.is_empty());
        assert_eq!(i.build(), "import \"./polyfill\";\n");
    }
}
