//! TypeScript class builder.

use protorx_codegen::builder::{CodeBuilder, CodeFragment, Renderable};

/// A parameter of a class method.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub ty: String,
    pub optional: bool,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    fn render(&self) -> String {
        let optional = if self.optional { "?" } else { "" };
        format!("{}{}: {}", self.name, optional, self.ty)
    }
}

/// A method (or constructor) of a class.
#[derive(Debug, Clone)]
pub struct Method {
    name: String,
    is_abstract: bool,
    params: Vec<Param>,
    return_type: Option<String>,
    body: Vec<CodeFragment>,
}

impl Method {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
            params: Vec::new(),
            return_type: None,
            body: Vec::new(),
        }
    }

    /// Declare without a body.
    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    /// Add a line to the method body.
    pub fn body_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(CodeFragment::Line(line.into()));
        self
    }

    /// Add a fragment (e.g. a nested block) to the method body.
    pub fn body_fragment(mut self, fragment: CodeFragment) -> Self {
        self.body.push(fragment);
        self
    }

    fn signature(&self) -> String {
        let params = self
            .params
            .iter()
            .map(Param::render)
            .collect::<Vec<_>>()
            .join(", ");
        let abstract_kw = if self.is_abstract { "abstract " } else { "" };
        match &self.return_type {
            Some(ret) => format!("{}{}({}): {}", abstract_kw, self.name, params, ret),
            None => format!("{}{}({})", abstract_kw, self.name, params),
        }
    }
}

impl Renderable for Method {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        if self.is_abstract {
            return vec![CodeFragment::Line(format!("{};", self.signature()))];
        }
        vec![CodeFragment::Block {
            header: format!("{} {{", self.signature()),
            body: self.body.clone(),
            close: Some("}".to_string()),
        }]
    }
}

/// A member of a class body.
#[derive(Debug, Clone)]
pub enum Member {
    /// A field declaration, written as-is with a trailing `;`.
    Field(String),
    Method(Method),
    Comment(String),
    Blank,
}

/// Builder for TypeScript classes.
///
/// # Example
///
/// ```
/// use protorx_codegen_typescript::ast::{Class, Method};
///
/// let code = Class::new("GreeterClient")
///     .extends("grpc.Client")
///     .method(Method::new("close").body_line("super.close();"))
///     .build();
/// assert!(code.starts_with("export class GreeterClient extends grpc.Client {\n"));
/// ```
#[derive(Debug, Clone)]
pub struct Class {
    name: String,
    exported: bool,
    is_abstract: bool,
    extends: Option<String>,
    members: Vec<Member>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            exported: true,
            is_abstract: false,
            extends: None,
            members: Vec::new(),
        }
    }

    pub fn abstract_(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.extends = Some(base.into());
        self
    }

    pub fn field(mut self, declaration: impl Into<String>) -> Self {
        self.members.push(Member::Field(declaration.into()));
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.members.push(Member::Method(method));
        self
    }

    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.members.push(Member::Comment(text.into()));
        self
    }

    /// Separate member groups with a blank line. No-op on an empty body or
    /// right after another blank.
    pub fn blank(mut self) -> Self {
        if !matches!(self.members.last(), None | Some(Member::Blank)) {
            self.members.push(Member::Blank);
        }
        self
    }

    fn header(&self) -> String {
        let export = if self.exported { "export " } else { "" };
        let abstract_kw = if self.is_abstract { "abstract " } else { "" };
        match &self.extends {
            Some(base) => format!(
                "{}{}class {} extends {} {{",
                export, abstract_kw, self.name, base
            ),
            None => format!("{}{}class {} {{", export, abstract_kw, self.name),
        }
    }

    /// Build the class as a string.
    pub fn build(&self) -> String {
        let mut builder = CodeBuilder::typescript();
        builder.emit(self);
        builder.build()
    }
}

impl Renderable for Class {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut members = self.members.as_slice();
        while let Some((Member::Blank, rest)) = members.split_last() {
            members = rest;
        }

        let body = members
            .iter()
            .flat_map(|member| match member {
                Member::Field(decl) => vec![CodeFragment::Line(format!("{};", decl))],
                Member::Method(method) => method.to_fragments(),
                Member::Comment(text) => vec![CodeFragment::Comment(text.clone())],
                Member::Blank => vec![CodeFragment::Blank],
            })
            .collect();

        vec![CodeFragment::Block {
            header: self.header(),
            body,
            close: Some("}".to_string()),
        }]
    }
}
