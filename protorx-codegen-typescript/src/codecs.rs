//! Codec field declarations and references.

use protorx_codegen::model::{Codec, CodecKind, CodecTable, MessageRef};

/// Private field declaration holding one codec.
pub(crate) fn field(codec: &Codec) -> String {
    match codec.kind {
        CodecKind::Serializer => format!(
            "private serialize{} = (message: {}) => <Buffer>{}.encode(message).finish()",
            codec.ident,
            codec.message.interface(),
            codec.message.qualified()
        ),
        CodecKind::Deserializer => format!(
            "private deserialize{} = (buffer: Buffer) => {}.decode(<Uint8Array>buffer)",
            codec.ident,
            codec.message.qualified()
        ),
    }
}

/// All codec fields of a table, serializers first.
pub(crate) fn fields(table: &CodecTable) -> impl Iterator<Item = String> + '_ {
    table.serializers().chain(table.deserializers()).map(field)
}

/// `this.serialize<ident>` for `message`.
pub(crate) fn serializer(table: &CodecTable, message: &MessageRef) -> String {
    let ident = table
        .serializer(message)
        .map_or(message.name.as_str(), |c| c.ident.as_str());
    format!("this.serialize{}", ident)
}

/// `this.deserialize<ident>` for `message`.
pub(crate) fn deserializer(table: &CodecTable, message: &MessageRef) -> String {
    let ident = table
        .deserializer(message)
        .map_or(message.name.as_str(), |c| c.ident.as_str());
    format!("this.deserialize{}", ident)
}
