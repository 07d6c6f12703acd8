use serde::Serialize;

/// A byte range in the source message.
///
/// Both ends always sit on `char` boundaries, so a span never splits a
/// codepoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Resolve this span against the message it was produced from.
    pub fn get<'a>(&self, message: &'a str) -> &'a str {
        &message[self.start..self.end]
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Token classification for tagtext markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Literal text between tags.
    Text,
    /// `<name:args>`
    OpenTag,
    /// `</name:args>`
    CloseTag,
    /// `<name:args/>`
    OpenCloseTag,
    /// One `:`-separated part of a tag body, including the name.
    TagValue,
}

impl TokenKind {
    pub fn is_tag(self) -> bool {
        matches!(
            self,
            TokenKind::OpenTag | TokenKind::CloseTag | TokenKind::OpenCloseTag
        )
    }
}

/// A token produced by the tagtext lexer.
///
/// Tokens are views into the message; they never own text. Tag tokens carry
/// their argument parts as `TagValue` children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub children: Vec<Token>,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self {
            kind,
            span,
            children: Vec::new(),
        }
    }

    pub(crate) fn with_children(mut self, children: Vec<Token>) -> Self {
        self.children = children;
        self
    }

    /// The raw source text covered by this token.
    pub fn text<'a>(&self, message: &'a str) -> &'a str {
        self.span.get(message)
    }
}
