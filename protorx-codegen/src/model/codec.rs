//! Deduplicated codec bindings of a service.

use indexmap::IndexMap;

use super::{GeneratorKind, MessageRef, MethodModel};

/// Direction of a codec binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    /// Message to bytes.
    Serializer,
    /// Bytes to message.
    Deserializer,
}

/// One codec binding: a message type and the identifier of the private
/// field holding its serializer or deserializer in the generated class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codec {
    pub kind: CodecKind,
    pub message: MessageRef,
    /// Field identifier suffix (`serialize<ident>` / `deserialize<ident>`).
    pub ident: String,
}

/// Serializer and deserializer bindings of one service, one entry per
/// distinct message type, in first-encounter order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecTable {
    serializers: IndexMap<String, Codec>,
    deserializers: IndexMap<String, Codec>,
}

impl CodecTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the codecs a generator needs for `methods`.
    ///
    /// Clients serialize requests and deserialize responses. Servers need all
    /// four directions. The manifest needs none.
    pub fn bind(methods: &[MethodModel], kind: GeneratorKind) -> Self {
        let mut table = Self::new();
        for method in methods {
            match kind {
                GeneratorKind::Client => {
                    table.register(CodecKind::Serializer, &method.request);
                    table.register(CodecKind::Deserializer, &method.response);
                }
                GeneratorKind::Server => {
                    table.register(CodecKind::Serializer, &method.request);
                    table.register(CodecKind::Serializer, &method.response);
                    table.register(CodecKind::Deserializer, &method.request);
                    table.register(CodecKind::Deserializer, &method.response);
                }
                GeneratorKind::Meta => {}
            }
        }
        table
    }

    /// Register a binding unless the type already has one. Returns `true` if added.
    pub fn register(&mut self, kind: CodecKind, message: &MessageRef) -> bool {
        let map = match kind {
            CodecKind::Serializer => &mut self.serializers,
            CodecKind::Deserializer => &mut self.deserializers,
        };
        if map.contains_key(&message.full_name) {
            return false;
        }

        let ident = unique_ident(map, message);
        map.insert(
            message.full_name.clone(),
            Codec {
                kind,
                message: message.clone(),
                ident,
            },
        );
        true
    }

    pub fn serializer(&self, message: &MessageRef) -> Option<&Codec> {
        self.serializers.get(&message.full_name)
    }

    pub fn deserializer(&self, message: &MessageRef) -> Option<&Codec> {
        self.deserializers.get(&message.full_name)
    }

    pub fn serializers(&self) -> impl Iterator<Item = &Codec> {
        self.serializers.values()
    }

    pub fn deserializers(&self) -> impl Iterator<Item = &Codec> {
        self.deserializers.values()
    }

    /// Total number of bindings.
    pub fn len(&self) -> usize {
        self.serializers.len() + self.deserializers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serializers.is_empty() && self.deserializers.is_empty()
    }
}

/// Leaf name, else the qualified path with `_` separators, else that path
/// with the first free numeric suffix.
fn unique_ident(map: &IndexMap<String, Codec>, message: &MessageRef) -> String {
    let taken = |ident: &str| map.values().any(|c| c.ident == ident);
    if !taken(message.name.as_str()) {
        return message.name.clone();
    }
    let qualified = message.qualified().replace('.', "_");
    if !taken(&qualified) {
        return qualified;
    }
    (2..)
        .map(|n| format!("{}_{}", qualified, n))
        .find(|candidate| !taken(candidate.as_str()))
        .unwrap_or(qualified)
}
