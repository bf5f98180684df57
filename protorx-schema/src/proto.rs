//! Parser for the subset of `.proto` sources the generator needs.
//!
//! Only declarations are modelled: packages, imports, messages (with their
//! nested messages and enums), enums and services with their rpc methods.
//! Field definitions, options, `oneof`, `reserved`, `extensions` and `extend`
//! blocks are skipped token-wise.

use crate::{Result, error::SourceContext};

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Str(String),
    Number,
    Symbol(char),
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    offset: usize,
    len: usize,
}

impl Token {
    fn span(&self) -> (usize, usize) {
        (self.offset, self.len)
    }

    fn is_symbol(&self, c: char) -> bool {
        self.kind == TokenKind::Symbol(c)
    }

    fn is_ident(&self, word: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(w) if w == word)
    }
}

fn tokenize(ctx: &SourceContext) -> Result<Vec<Token>> {
    let src = ctx.src();
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let c = bytes[pos];
        let start = pos;

        if c.is_ascii_whitespace() {
            pos += 1;
        } else if src[pos..].starts_with("//") {
            pos = src[pos..].find('\n').map_or(bytes.len(), |n| pos + n);
        } else if src[pos..].starts_with("/*") {
            match src[pos + 2..].find("*/") {
                Some(n) => pos += n + 4,
                None => return Err(ctx.syntax_error("unterminated comment", (start, 2))),
            }
        } else if c.is_ascii_alphabetic() || c == b'_' {
            while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
                pos += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident(src[start..pos].to_string()),
                offset: start,
                len: pos - start,
            });
        } else if c.is_ascii_digit() {
            while pos < bytes.len()
                && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'.' || bytes[pos] == b'_')
            {
                pos += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Number,
                offset: start,
                len: pos - start,
            });
        } else if c == b'"' || c == b'\'' {
            pos += 1;
            let mut value = String::new();
            loop {
                match bytes.get(pos).copied() {
                    None | Some(b'\n') => {
                        return Err(ctx.syntax_error("unterminated string", (start, pos - start)));
                    }
                    Some(b) if b == c => {
                        pos += 1;
                        break;
                    }
                    Some(b'\\') => {
                        // escapes only matter for skipping; keep the escaped char verbatim
                        if let Some(ch) = src[pos + 1..].chars().next() {
                            value.push(ch);
                            pos += 1 + ch.len_utf8();
                        } else {
                            pos += 1;
                        }
                    }
                    Some(_) => {
                        let ch = src[pos..].chars().next().unwrap_or_default();
                        value.push(ch);
                        pos += ch.len_utf8().max(1);
                    }
                }
            }
            tokens.push(Token {
                kind: TokenKind::Str(value),
                offset: start,
                len: pos - start,
            });
        } else {
            let ch = src[pos..].chars().next().unwrap_or_default();
            pos += ch.len_utf8().max(1);
            tokens.push(Token {
                kind: TokenKind::Symbol(ch),
                offset: start,
                len: pos - start,
            });
        }
    }

    Ok(tokens)
}

/// A parsed `.proto` file.
#[derive(Debug, Default)]
pub(crate) struct ProtoFile {
    pub package: Vec<String>,
    pub imports: Vec<ImportDecl>,
    pub decls: Vec<Decl>,
}

/// An `import "path";` statement with its source span.
#[derive(Debug, Clone)]
pub(crate) struct ImportDecl {
    pub path: String,
    pub span: (usize, usize),
}

#[derive(Debug, Clone)]
pub(crate) enum Decl {
    Message { name: String, nested: Vec<Decl> },
    Enum { name: String },
    Service { name: String, methods: Vec<RpcDecl> },
}

#[derive(Debug, Clone)]
pub(crate) struct RpcDecl {
    pub name: String,
    pub request_type: String,
    pub request_stream: bool,
    pub response_type: String,
    pub response_stream: bool,
}

struct Parser<'a> {
    ctx: &'a SourceContext,
    tokens: Vec<Token>,
    pos: usize,
}

/// Parse a `.proto` source.
pub(crate) fn parse(ctx: &SourceContext) -> Result<ProtoFile> {
    let tokens = tokenize(ctx)?;
    Parser {
        ctx,
        tokens,
        pos: 0,
    }
    .file()
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    fn end_span(&self) -> (usize, usize) {
        (self.ctx.src().len(), 0)
    }

    fn next(&mut self, expected: &str) -> Result<Token> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                Ok(token.clone())
            }
            None => Err(self
                .ctx
                .syntax_error(format!("expected {}, found end of file", expected), self.end_span())),
        }
    }

    fn expect_symbol(&mut self, c: char) -> Result<Token> {
        let token = self.next(&format!("'{}'", c))?;
        if token.is_symbol(c) {
            Ok(token)
        } else {
            Err(self.ctx.syntax_error(format!("expected '{}'", c), token.span()))
        }
    }

    fn ident(&mut self, what: &str) -> Result<String> {
        let token = self.next(what)?;
        match token.kind {
            TokenKind::Ident(name) => Ok(name),
            _ => Err(self.ctx.syntax_error(format!("expected {}", what), token.span())),
        }
    }

    fn string(&mut self, what: &str) -> Result<(String, (usize, usize))> {
        let token = self.next(what)?;
        let span = token.span();
        match token.kind {
            TokenKind::Str(value) => Ok((value, span)),
            _ => Err(self.ctx.syntax_error(format!("expected {}", what), span)),
        }
    }

    /// `[.]ident{.ident}`
    fn type_name(&mut self) -> Result<String> {
        let mut name = String::new();
        if self.peek().is_some_and(|t| t.is_symbol('.')) {
            self.pos += 1;
            name.push('.');
        }
        name.push_str(&self.ident("type name")?);
        while self.peek().is_some_and(|t| t.is_symbol('.')) {
            self.pos += 1;
            name.push('.');
            name.push_str(&self.ident("type name")?);
        }
        Ok(name)
    }

    /// Skip a statement up to its `;`, or through a `{ ... }` block that ends it.
    fn skip_statement(&mut self) -> Result<()> {
        let mut depth = 0usize;
        loop {
            let token = self.next("';'")?;
            match token.kind {
                TokenKind::Symbol('(' | '[' | '<') => depth += 1,
                TokenKind::Symbol(')' | ']' | '>') => depth = depth.saturating_sub(1),
                TokenKind::Symbol(';') if depth == 0 => return Ok(()),
                TokenKind::Symbol('{') if depth == 0 => {
                    self.pos -= 1;
                    return self.skip_block();
                }
                // option values may contain aggregate literals
                TokenKind::Symbol('{') => self.skip_block_body()?,
                TokenKind::Symbol('}') if depth == 0 => {
                    return Err(self.ctx.syntax_error("unexpected '}'", token.span()));
                }
                _ => {}
            }
        }
    }

    fn skip_block(&mut self) -> Result<()> {
        self.expect_symbol('{')?;
        self.skip_block_body()
    }

    /// Skip tokens up to the `}` balancing an already consumed `{`.
    fn skip_block_body(&mut self) -> Result<()> {
        let mut depth = 1usize;
        while depth > 0 {
            let token = self.next("'}'")?;
            if token.is_symbol('{') {
                depth += 1;
            } else if token.is_symbol('}') {
                depth -= 1;
            }
        }
        Ok(())
    }

    fn file(mut self) -> Result<ProtoFile> {
        let mut file = ProtoFile::default();

        while let Some(token) = self.peek().cloned() {
            let TokenKind::Ident(keyword) = &token.kind else {
                if token.is_symbol(';') {
                    self.pos += 1;
                    continue;
                }
                return Err(self.ctx.syntax_error("expected a declaration", token.span()));
            };

            match keyword.as_str() {
                "package" => {
                    self.pos += 1;
                    let name = self.type_name()?;
                    self.expect_symbol(';')?;
                    file.package = name.split('.').map(str::to_string).collect();
                }
                "import" => {
                    self.pos += 1;
                    if self
                        .peek()
                        .is_some_and(|t| t.is_ident("public") || t.is_ident("weak"))
                    {
                        self.pos += 1;
                    }
                    let (path, span) = self.string("import path")?;
                    self.expect_symbol(';')?;
                    file.imports.push(ImportDecl { path, span });
                }
                "syntax" | "edition" | "option" => self.skip_statement()?,
                "extend" => {
                    self.pos += 1;
                    self.type_name()?;
                    self.skip_block()?;
                }
                _ => {
                    if let Some(decl) = self.declaration()? {
                        file.decls.push(decl);
                    } else {
                        return Err(self.ctx.syntax_error(
                            format!("unexpected '{}' at top level", keyword),
                            token.span(),
                        ));
                    }
                }
            }
        }

        Ok(file)
    }

    /// Parse a message, enum or service declaration if one starts here.
    fn declaration(&mut self) -> Result<Option<Decl>> {
        let Some(token) = self.peek() else {
            return Ok(None);
        };
        let decl = if token.is_ident("message") {
            self.pos += 1;
            self.message()?
        } else if token.is_ident("enum") {
            self.pos += 1;
            let name = self.ident("enum name")?;
            self.skip_block()?;
            Decl::Enum { name }
        } else if token.is_ident("service") {
            self.pos += 1;
            self.service()?
        } else {
            return Ok(None);
        };
        Ok(Some(decl))
    }

    fn message(&mut self) -> Result<Decl> {
        let name = self.ident("message name")?;
        self.expect_symbol('{')?;
        let mut nested = Vec::new();

        loop {
            let Some(token) = self.peek().cloned() else {
                return Err(self.ctx.syntax_error("expected '}'", self.end_span()));
            };
            if token.is_symbol('}') {
                self.pos += 1;
                break;
            }
            if token.is_symbol(';') {
                self.pos += 1;
                continue;
            }
            if let Some(decl) = self.declaration()? {
                if matches!(decl, Decl::Service { .. }) {
                    return Err(self
                        .ctx
                        .syntax_error("services cannot be nested in messages", token.span()));
                }
                nested.push(decl);
            } else if token.is_ident("oneof") || token.is_ident("extend") {
                self.pos += 1;
                self.type_name()?;
                self.skip_block()?;
            } else {
                // fields, map fields, groups, reserved, extensions, options
                self.skip_statement()?;
            }
        }

        Ok(Decl::Message { name, nested })
    }

    fn service(&mut self) -> Result<Decl> {
        let name = self.ident("service name")?;
        self.expect_symbol('{')?;
        let mut methods = Vec::new();

        loop {
            let token = self.next("'}'")?;
            if token.is_symbol('}') {
                break;
            }
            if token.is_symbol(';') {
                continue;
            }
            if token.is_ident("rpc") {
                methods.push(self.rpc()?);
            } else if token.is_ident("option") {
                self.skip_statement()?;
            } else {
                return Err(self.ctx.syntax_error("expected 'rpc'", token.span()));
            }
        }

        Ok(Decl::Service { name, methods })
    }

    fn rpc(&mut self) -> Result<RpcDecl> {
        let name = self.ident("method name")?;
        let (request_stream, request_type) = self.rpc_type()?;
        let returns = self.next("'returns'")?;
        if !returns.is_ident("returns") {
            return Err(self.ctx.syntax_error("expected 'returns'", returns.span()));
        }
        let (response_stream, response_type) = self.rpc_type()?;

        match self.peek() {
            Some(t) if t.is_symbol('{') => self.skip_block()?,
            _ => {
                self.expect_symbol(';')?;
            }
        }

        Ok(RpcDecl {
            name,
            request_type,
            request_stream,
            response_type,
            response_stream,
        })
    }

    /// `( [stream] TypeName )`
    fn rpc_type(&mut self) -> Result<(bool, String)> {
        self.expect_symbol('(')?;
        let stream = self.peek().is_some_and(|t| t.is_ident("stream"))
            && self
                .peek_at(1)
                .is_some_and(|t| matches!(t.kind, TokenKind::Ident(_)) || t.is_symbol('.'));
        if stream {
            self.pos += 1;
        }
        let name = self.type_name()?;
        self.expect_symbol(')')?;
        Ok((stream, name))
    }
}
