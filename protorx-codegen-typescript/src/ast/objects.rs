//! TypeScript/JavaScript object literal builder.

use protorx_codegen::builder::{CodeBuilder, CodeFragment, Renderable};

use super::arrays::JsArray;

/// A property in a JavaScript object literal.
#[derive(Debug, Clone)]
pub struct Property {
    pub key: String,
    pub value: PropertyValue,
}

/// The value of an object property.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// A literal string value (will be quoted).
    String(String),
    /// A raw expression (will not be quoted).
    Raw(String),
    /// A nested object.
    Object(JsObject),
    /// An arrow function body.
    ArrowFn(ArrowFn),
    /// An array literal.
    Array(JsArray),
    /// A `//` comment in place of a property; the key is not rendered.
    Comment(String),
}

impl Property {
    /// Create a property with a string value (will be quoted).
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::String(value.into()),
        }
    }

    /// Create a property with a raw expression value (will not be quoted).
    pub fn raw(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::Raw(value.into()),
        }
    }

    fn to_fragment(&self) -> CodeFragment {
        match &self.value {
            PropertyValue::String(s) => CodeFragment::Line(format!("{}: \"{}\",", self.key, s)),
            PropertyValue::Raw(s) => CodeFragment::Line(format!("{}: {},", self.key, s)),
            PropertyValue::Object(obj) => CodeFragment::Block {
                header: format!("{}: {{", self.key),
                body: obj.properties_to_fragments(),
                close: Some("},".to_string()),
            },
            PropertyValue::ArrowFn(func) => CodeFragment::Block {
                header: format!("{}: ({}) => {{", self.key, func.params),
                body: func
                    .body
                    .iter()
                    .map(|line| CodeFragment::Line(line.clone()))
                    .collect(),
                close: Some("},".to_string()),
            },
            PropertyValue::Array(arr) if arr.is_inline() => {
                CodeFragment::Line(format!("{}: {},", self.key, arr.build()))
            }
            PropertyValue::Array(arr) => CodeFragment::Block {
                header: format!("{}: [", self.key),
                body: arr.element_fragments(),
                close: Some("],".to_string()),
            },
            PropertyValue::Comment(text) => CodeFragment::Comment(text.clone()),
        }
    }
}

/// An arrow function for use as a property value.
#[derive(Debug, Clone)]
pub struct ArrowFn {
    pub params: String,
    pub body: Vec<String>,
}

impl ArrowFn {
    pub fn new(params: impl Into<String>) -> Self {
        Self {
            params: params.into(),
            body: Vec::new(),
        }
    }

    pub fn body_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(line.into());
        self
    }
}

/// Builder for JavaScript/TypeScript object literals.
#[derive(Debug, Clone, Default)]
pub struct JsObject {
    properties: Vec<Property>,
}

impl JsObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property with a string value (will be quoted).
    pub fn string(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(Property::string(key, value));
        self
    }

    /// Add a property with a raw expression value (will not be quoted).
    pub fn raw(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.push(Property::raw(key, value));
        self
    }

    /// Add a property with a nested object value.
    pub fn object(mut self, key: impl Into<String>, value: JsObject) -> Self {
        self.properties.push(Property {
            key: key.into(),
            value: PropertyValue::Object(value),
        });
        self
    }

    /// Add an arrow function property.
    pub fn arrow_fn(mut self, key: impl Into<String>, value: ArrowFn) -> Self {
        self.properties.push(Property {
            key: key.into(),
            value: PropertyValue::ArrowFn(value),
        });
        self
    }

    /// Add an array property.
    pub fn array(mut self, key: impl Into<String>, value: JsArray) -> Self {
        self.properties.push(Property {
            key: key.into(),
            value: PropertyValue::Array(value),
        });
        self
    }

    /// Add a comment line between properties.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.properties.push(Property {
            key: String::new(),
            value: PropertyValue::Comment(text.into()),
        });
        self
    }

    /// Check if the object is empty.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Property lines without the surrounding braces.
    pub fn properties_to_fragments(&self) -> Vec<CodeFragment> {
        self.properties.iter().map(Property::to_fragment).collect()
    }

    /// Build the object as a string.
    pub fn build(&self) -> String {
        let mut builder = CodeBuilder::typescript();
        builder.emit(self);
        builder.build()
    }
}

impl Renderable for JsObject {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        if self.properties.is_empty() {
            return vec![CodeFragment::Raw("{}".to_string())];
        }

        vec![CodeFragment::Block {
            header: "{".to_string(),
            body: self.properties_to_fragments(),
            close: Some("}".to_string()),
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object() {
        let obj = JsObject::new().build();
        assert_eq!(obj, "{}");
    }

    #[test]
    fn test_object_with_string_and_raw() {
        let obj = JsObject::new()
            .string("service", "foo.Svc")
            .raw("reqStream", "false")
            .build();
        assert_eq!(obj, "{\n  service: \"foo.Svc\",\n  reqStream: false,\n}\n");
    }

    #[test]
    fn test_nested_object() {
        let inner = JsObject::new().raw("path", "\"/a.Svc/Call\"");
        let outer = JsObject::new().object("Call", inner);
        assert_eq!(
            outer.build(),
            "{\n  Call: {\n    path: \"/a.Svc/Call\",\n  },\n}\n"
        );
    }

    #[test]
    fn test_arrow_fn() {
        let func = ArrowFn::new("call, callback").body_line("handle(call, callback);");
        let obj = JsObject::new().arrow_fn("Call", func).build();
        assert!(obj.contains("  Call: (call, callback) => {\n    handle(call, callback);\n  },\n"));
    }

    #[test]
    fn test_comment_property() {
        let obj = JsObject::new()
            .raw("a", "1")
            .comment("b is not supported")
            .build();
        assert_eq!(obj, "{\n  a: 1,\n  // b is not supported\n}\n");
    }

    #[test]
    fn test_array_of_objects_is_multiline() {
        let arr = JsArray::new().object(JsObject::new().raw("x", "1"));
        let obj = JsObject::new().array("items", arr).build();
        assert_eq!(obj, "{\n  items: [\n    {\n      x: 1,\n    },\n  ],\n}\n");
    }
}
