//! Loader for protobuf JSON descriptors.
//!
//! The layout is the one emitted by `pbjs -t json`:
//!
//! ```json
//! { "nested": { "foo": { "nested": {
//!     "Svc": { "methods": { "Watch": {
//!         "requestType": "Req", "responseType": "Event", "responseStream": true } } },
//!     "Req": { "fields": {} }
//! } } } }
//! ```
//!
//! A node with `methods` is a service, with `fields` a message, with `values`
//! an enum; anything else is a namespace.

use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    Error, Result,
    error::SourceContext,
    reflect::{EnumType, MessageType, Namespace, Nested, Node, Root, Service},
};

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(default)]
    nested: Option<IndexMap<String, RawNode>>,
    #[serde(default)]
    fields: Option<serde_json::Value>,
    #[serde(default)]
    values: Option<serde_json::Value>,
    #[serde(default)]
    methods: Option<IndexMap<String, RawMethod>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMethod {
    request_type: String,
    response_type: String,
    #[serde(default)]
    request_stream: bool,
    #[serde(default)]
    response_stream: bool,
}

/// Parse a JSON descriptor into `root`.
pub(crate) fn load_into(root: &mut Root, content: &str, path: &Path) -> Result<()> {
    let ctx = SourceContext::new(content, path.display().to_string());
    let raw: RawNode = serde_json::from_str(content).map_err(|e| ctx.json_error(e))?;

    let (nested, full_name) = root
        .define_namespace(&[])
        .map_err(|dup| Error::duplicate_name(dup.0, path))?;
    if let Some(children) = raw.nested {
        insert_children(nested, &full_name, children, path)?;
    }
    Ok(())
}

fn insert_children(
    nested: &mut Nested,
    parent: &str,
    children: IndexMap<String, RawNode>,
    path: &Path,
) -> Result<()> {
    for (name, raw) in children {
        let node = convert(&name, parent, raw, path)?;
        merge(nested, name, node, path)?;
    }
    Ok(())
}

fn convert(name: &str, parent: &str, raw: RawNode, path: &Path) -> Result<Node> {
    if let Some(methods) = raw.methods {
        let mut service = Service::new(name, parent);
        for (method_name, m) in methods {
            service.add_method(
                method_name,
                m.request_type,
                m.request_stream,
                m.response_type,
                m.response_stream,
            );
        }
        return Ok(Node::Service(service));
    }

    if raw.fields.is_some() {
        let mut message = MessageType::new(name, parent);
        if let Some(children) = raw.nested {
            let full_name = message.full_name.clone();
            insert_children(&mut message.nested, &full_name, children, path)?;
        }
        return Ok(Node::Type(message));
    }

    if raw.values.is_some() {
        return Ok(Node::Enum(EnumType::new(name, parent)));
    }

    let mut namespace = Namespace::new(name, parent);
    if let Some(children) = raw.nested {
        let full_name = namespace.full_name.clone();
        insert_children(&mut namespace.nested, &full_name, children, path)?;
    }
    Ok(Node::Namespace(namespace))
}

/// Insert `node`, merging namespaces that were already declared by an earlier file.
fn merge(nested: &mut Nested, name: String, node: Node, path: &Path) -> Result<()> {
    match (nested.get_mut(&name), node) {
        (None, node) => {
            nested.insert(name, node);
            Ok(())
        }
        (Some(Node::Namespace(existing)), Node::Namespace(incoming)) => {
            for (child_name, child) in incoming.nested {
                merge(&mut existing.nested, child_name, child, path)?;
            }
            Ok(())
        }
        (Some(existing), _) => Err(Error::duplicate_name(existing.full_name(), path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(content: &str) -> Result<Root> {
        let mut root = Root::new();
        load_into(&mut root, content, Path::new("test.json"))?;
        Ok(root)
    }

    #[test]
    fn test_classifies_nodes() {
        let root = load(
            r#"{ "nested": { "foo": { "nested": {
                "Svc": { "methods": { "Get": { "requestType": "Req", "responseType": "Res" } } },
                "Req": { "fields": {} },
                "Res": { "fields": { "id": { "type": "string", "id": 1 } } },
                "Kind": { "values": { "A": 0 } }
            } } } }"#,
        )
        .unwrap();

        assert_eq!(root.get(".foo").unwrap().kind(), "namespace");
        assert_eq!(root.get(".foo.Svc").unwrap().kind(), "service");
        assert_eq!(root.get(".foo.Req").unwrap().kind(), "message");
        assert_eq!(root.get(".foo.Kind").unwrap().kind(), "enum");
    }

    #[test]
    fn test_stream_flags_default_to_false() {
        let root = load(
            r#"{ "nested": { "Svc": { "methods": {
                "A": { "requestType": "M", "responseType": "M" },
                "B": { "requestType": "M", "responseType": "M", "requestStream": true, "responseStream": true }
            } }, "M": { "fields": {} } } }"#,
        )
        .unwrap();

        let svc = root.get(".Svc").and_then(Node::as_service).unwrap();
        assert!(!svc.methods[0].request_stream && !svc.methods[0].response_stream);
        assert!(svc.methods[1].request_stream && svc.methods[1].response_stream);
    }

    #[test]
    fn test_nested_messages_keep_declaration_order() {
        let root = load(
            r#"{ "nested": { "Outer": { "fields": {}, "nested": {
                "Zed": { "fields": {} }, "Alpha": { "fields": {} }
            } } } }"#,
        )
        .unwrap();

        let names: Vec<_> = root
            .get(".Outer")
            .and_then(Node::nested)
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(names, ["Zed", "Alpha"]);
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = load("{ \"nested\": ").unwrap_err();
        assert!(matches!(*err, Error::Json { .. }));
    }

    #[test]
    fn test_second_file_merges_namespaces() {
        let mut root = Root::new();
        load_into(
            &mut root,
            r#"{ "nested": { "pkg": { "nested": { "A": { "fields": {} } } } } }"#,
            Path::new("a.json"),
        )
        .unwrap();
        load_into(
            &mut root,
            r#"{ "nested": { "pkg": { "nested": { "B": { "fields": {} } } } } }"#,
            Path::new("b.json"),
        )
        .unwrap();

        assert!(root.get(".pkg.A").is_some());
        assert!(root.get(".pkg.B").is_some());
    }

    #[test]
    fn test_duplicate_message_is_fatal() {
        let mut root = Root::new();
        let doc = r#"{ "nested": { "A": { "fields": {} } } }"#;
        load_into(&mut root, doc, Path::new("a.json")).unwrap();
        let err = load_into(&mut root, doc, Path::new("b.json")).unwrap_err();
        assert!(matches!(*err, Error::DuplicateName { ref name, .. } if name == ".A"));
    }
}
