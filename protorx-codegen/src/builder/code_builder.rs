//! Indentation-tracking text buffer that renders code fragments.

use super::{CodeFragment, Indent, Renderable};

/// Accumulates generated lines at the current nesting depth.
///
/// Emitters build [`CodeFragment`] trees and hand them to [`emit`](Self::emit);
/// the builder only decides where indentation goes.
///
/// # Example
///
/// ```
/// use protorx_codegen::builder::{CodeBuilder, CodeFragment, Indent};
///
/// let block = vec![CodeFragment::block(
///     "constructor() {",
///     vec![CodeFragment::line("super();")],
///     Some("}".to_string()),
/// )];
/// let mut builder = CodeBuilder::new(Indent::Tab);
/// builder.emit(&block);
/// assert_eq!(builder.build(), "constructor() {\n\tsuper();\n}\n");
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    depth: usize,
    indent: Indent,
    buffer: String,
}

impl CodeBuilder {
    pub fn new(indent: Indent) -> Self {
        Self {
            depth: 0,
            indent,
            buffer: String::new(),
        }
    }

    /// Builder with 2-space indentation.
    pub fn typescript() -> Self {
        Self::new(Indent::TYPESCRIPT)
    }

    /// Add a line at the current depth.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        for _ in 0..self.depth {
            self.buffer.push_str(self.indent.as_str());
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add an empty line; blank lines carry no indentation.
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    /// Render every fragment of `node`.
    pub fn emit(&mut self, node: &impl Renderable) -> &mut Self {
        for fragment in node.to_fragments() {
            self.apply_fragment(fragment);
        }
        self
    }

    pub fn apply_fragment(&mut self, fragment: CodeFragment) {
        match fragment {
            CodeFragment::Line(s) => {
                self.push_line(&s);
            }
            CodeFragment::Blank => {
                self.push_blank();
            }
            CodeFragment::Raw(s) => self.buffer.push_str(&s),
            CodeFragment::Block {
                header,
                body,
                close,
            } => {
                self.push_line(&header);
                self.nested(body);
                if let Some(c) = close {
                    self.push_line(&c);
                }
            }
            CodeFragment::Indent(fragments) => self.nested(fragments),
            CodeFragment::Sequence(fragments) => {
                for f in fragments {
                    self.apply_fragment(f);
                }
            }
            CodeFragment::Comment(text) => {
                self.push_line(&format!("// {}", text));
            }
        }
    }

    /// Add a line and return the builder, for one-off statements.
    pub fn line(mut self, s: &str) -> Self {
        self.push_line(s);
        self
    }

    pub fn build(self) -> String {
        self.buffer
    }

    fn nested(&mut self, fragments: Vec<CodeFragment>) {
        self.depth += 1;
        for f in fragments {
            self.apply_fragment(f);
        }
        self.depth -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(indent: Indent, fragments: Vec<CodeFragment>) -> String {
        let mut builder = CodeBuilder::new(indent);
        builder.emit(&fragments);
        builder.build()
    }

    #[test]
    fn test_basic_line() {
        let code = CodeBuilder::typescript().line("const x = 1;").build();
        assert_eq!(code, "const x = 1;\n");
    }

    #[test]
    fn test_block_with_tab_indent() {
        let code = render(
            Indent::Tab,
            vec![CodeFragment::block(
                "class A {",
                vec![CodeFragment::line("b = 1;")],
                Some("}".to_string()),
            )],
        );
        assert_eq!(code, "class A {\n\tb = 1;\n}\n");
    }

    #[test]
    fn test_blank_lines_are_not_indented() {
        let code = render(
            Indent::TYPESCRIPT,
            vec![CodeFragment::indent(vec![
                CodeFragment::line("a;"),
                CodeFragment::Blank,
                CodeFragment::line("b;"),
            ])],
        );
        assert_eq!(code, "  a;\n\n  b;\n");
    }

    #[test]
    fn test_comment_and_sequence() {
        let code = render(
            Indent::TYPESCRIPT,
            vec![CodeFragment::sequence(vec![
                CodeFragment::Comment("unsupported".to_string()),
                CodeFragment::indent(vec![CodeFragment::Comment("nested".to_string())]),
                CodeFragment::Raw("{}".to_string()),
            ])],
        );
        assert_eq!(code, "// unsupported\n  // nested\n{}");
    }
}
