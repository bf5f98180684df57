use std::fmt;

/// Streaming shape of an RPC method.
///
/// The request and response stream flags are independent, giving four shapes.
/// Every emitter matches on this exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodShape {
    /// Single request, single response.
    Unary,
    /// Single request, stream of responses.
    ServerStreaming,
    /// Stream of requests, single response.
    ClientStreaming,
    /// Streams in both directions.
    Bidirectional,
}

impl MethodShape {
    pub const ALL: [MethodShape; 4] = [
        MethodShape::Unary,
        MethodShape::ServerStreaming,
        MethodShape::ClientStreaming,
        MethodShape::Bidirectional,
    ];

    pub fn from_flags(request_stream: bool, response_stream: bool) -> Self {
        match (request_stream, response_stream) {
            (false, false) => MethodShape::Unary,
            (false, true) => MethodShape::ServerStreaming,
            (true, false) => MethodShape::ClientStreaming,
            (true, true) => MethodShape::Bidirectional,
        }
    }

    pub fn request_stream(self) -> bool {
        matches!(self, MethodShape::ClientStreaming | MethodShape::Bidirectional)
    }

    pub fn response_stream(self) -> bool {
        matches!(self, MethodShape::ServerStreaming | MethodShape::Bidirectional)
    }

    pub fn is_unary(self) -> bool {
        self == MethodShape::Unary
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MethodShape::Unary => "unary",
            MethodShape::ServerStreaming => "server streaming",
            MethodShape::ClientStreaming => "client streaming",
            MethodShape::Bidirectional => "bidi streaming",
        }
    }
}

impl fmt::Display for MethodShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
