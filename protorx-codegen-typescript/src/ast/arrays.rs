//! TypeScript/JavaScript array literal builder.

use protorx_codegen::builder::{CodeFragment, Renderable};

use super::objects::JsObject;

/// An element in a JavaScript array literal.
#[derive(Debug, Clone)]
pub enum ArrayElement {
    /// A literal string value (will be quoted).
    String(String),
    /// A raw expression (will not be quoted).
    Raw(String),
    /// An object literal, rendered on its own lines.
    Object(JsObject),
}

/// Builder for JavaScript/TypeScript array literals.
///
/// Arrays of scalars render on one line; arrays holding objects render one
/// element per block.
#[derive(Debug, Clone, Default)]
pub struct JsArray {
    elements: Vec<ArrayElement>,
}

impl JsArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string element (will be quoted).
    pub fn string(mut self, value: impl Into<String>) -> Self {
        self.elements.push(ArrayElement::String(value.into()));
        self
    }

    /// Add a raw expression element (will not be quoted).
    pub fn raw(mut self, value: impl Into<String>) -> Self {
        self.elements.push(ArrayElement::Raw(value.into()));
        self
    }

    pub fn object(mut self, value: JsObject) -> Self {
        self.elements.push(ArrayElement::Object(value));
        self
    }

    /// Check if the array is empty.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether the array renders on a single line.
    pub fn is_inline(&self) -> bool {
        !self
            .elements
            .iter()
            .any(|e| matches!(e, ArrayElement::Object(_)))
    }

    /// Element lines without the surrounding brackets, each with a trailing comma.
    pub fn element_fragments(&self) -> Vec<CodeFragment> {
        self.elements
            .iter()
            .map(|e| match e {
                ArrayElement::String(s) => CodeFragment::Line(format!("\"{}\",", s)),
                ArrayElement::Raw(s) => CodeFragment::Line(format!("{},", s)),
                ArrayElement::Object(obj) => CodeFragment::Block {
                    header: "{".to_string(),
                    body: obj.properties_to_fragments(),
                    close: Some("},".to_string()),
                },
            })
            .collect()
    }

    /// Build the single-line form of the array.
    ///
    /// Object elements are rendered as `{}` here; use [`Renderable`] for those.
    pub fn build(&self) -> String {
        let elements_str = self
            .elements
            .iter()
            .map(|e| match e {
                ArrayElement::String(s) => format!("\"{}\"", s),
                ArrayElement::Raw(s) => s.clone(),
                ArrayElement::Object(_) => "{}".to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        format!("[{}]", elements_str)
    }
}

impl Renderable for JsArray {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        if self.is_inline() {
            return vec![CodeFragment::Raw(self.build())];
        }
        vec![CodeFragment::Block {
            header: "[".to_string(),
            body: self.element_fragments(),
            close: Some("]".to_string()),
        }]
    }
}
