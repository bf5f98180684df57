use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for schema operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Encapsulates the source content and filename, reducing parameter passing
/// in error factory functions.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a JSON descriptor error from a serde_json error.
    pub fn json_error(&self, source: serde_json::Error) -> Box<Error> {
        let span = offset_of(&self.src, source.line(), source.column()).map(|o| (o, 0).into());
        Box::new(Error::Json {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Create a syntax error at the given span.
    pub fn syntax_error(&self, message: impl Into<String>, span: impl Into<SourceSpan>) -> Box<Error> {
        Box::new(Error::Syntax {
            src: self.named_source(),
            span: span.into(),
            message: message.into(),
        })
    }

    /// Create an error for an import that cannot be found on disk.
    pub fn import_not_found(
        &self,
        import: impl Into<String>,
        span: impl Into<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::ImportNotFound {
            src: self.named_source(),
            span: span.into(),
            import: import.into(),
        })
    }
}

/// Convert a 1-based line/column pair into a byte offset.
fn offset_of(src: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }
    let line_start: usize = src
        .split_inclusive('\n')
        .take(line - 1)
        .map(str::len)
        .sum();
    Some((line_start + column.saturating_sub(1)).min(src.len()))
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(protorx::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON descriptor")]
    #[diagnostic(
        code(protorx::json),
        help("descriptors use the protobuf JSON layout with a top-level `nested` object")
    )]
    Json {
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: Option<SourceSpan>,
        #[source]
        source: serde_json::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(protorx::syntax))]
    Syntax {
        #[source_code]
        src: NamedSource<String>,
        #[label("{message}")]
        span: SourceSpan,
        message: String,
    },

    #[error("import '{import}' not found")]
    #[diagnostic(
        code(protorx::import),
        help("imports are resolved relative to the importing file")
    )]
    ImportNotFound {
        #[source_code]
        src: NamedSource<String>,
        #[label("imported here")]
        span: SourceSpan,
        import: String,
    },

    #[error("duplicate name '{name}' in '{path}'")]
    #[diagnostic(
        code(protorx::duplicate_name),
        help("fully-qualified names must be unique within a schema")
    )]
    DuplicateName { name: String, path: PathBuf },
}

impl Error {
    /// Create an I/O error for the given path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }

    /// Create a duplicate name error
    pub fn duplicate_name(name: impl Into<String>, path: impl Into<PathBuf>) -> Box<Self> {
        Box::new(Error::DuplicateName {
            name: name.into(),
            path: path.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_of_first_line() {
        assert_eq!(offset_of("abc", 1, 2), Some(1));
    }

    #[test]
    fn test_offset_of_later_line() {
        let src = "{\n  \"nested\": x\n}";
        assert_eq!(offset_of(src, 2, 13), Some(14));
        assert_eq!(&src[14..15], "x");
    }

    #[test]
    fn test_offset_of_clamps_to_source() {
        assert_eq!(offset_of("ab", 1, 40), Some(2));
        assert_eq!(offset_of("ab", 0, 0), None);
    }

    #[test]
    fn test_syntax_error_message() {
        let ctx = SourceContext::new("service {", "a.proto");
        let err = ctx.syntax_error("expected identifier", (8usize, 1usize));
        assert_eq!(err.to_string(), "expected identifier");
    }
}
