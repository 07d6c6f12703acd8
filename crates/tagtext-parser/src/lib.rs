//! tagtext Parser
//!
//! Builds a tree of tag and text nodes from the token stream produced by
//! `tagtext-lexer`. Tag semantics come from the host through a [`TagResolver`];
//! the parser only decides which tags were recognized, how they nest, and
//! where they close.
//!
//! Malformed markup degrades to literal text unless strict mode is requested,
//! in which case unclosed tags, out-of-order closes and `<reset>` are errors.
//!
//! ```text
//! message → pre-process → tokenize → build_tree → Tree<C>
//! ```

pub mod builder;
pub mod part;
pub mod parser;
pub mod preprocess;
pub mod provider;
pub mod resolver;
pub mod sanitize;
pub mod tag;
pub mod trace;
pub mod tree;

pub use builder::build_tree;
pub use part::TagPart;
pub use parser::Parser;
pub use preprocess::resolve_pre_process_tags;
pub use provider::{sanitize_name, ResolverProvider, TagProvider};
pub use resolver::{ArgumentQueue, TagResolver};
pub use sanitize::{escape_tags, strip_tags};
pub use tag::{Inserting, Modifying, Tag};
pub use trace::Trace;
pub use tree::{NodeId, NodeKind, NodeRef, TagNode, Tree};

use tagtext_lexer::Token;

/// Parse error with the offending message and token spans.
///
/// The `Display` output appends the parsed text and a `^~~~^` marker under
/// every offending token.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}{context}", context = describe(.text, .tokens))]
pub struct ParseError {
    pub message: String,
    /// The message being parsed, after pre-processing.
    pub text: Option<String>,
    /// The message as the caller supplied it.
    pub original_text: Option<String>,
    pub tokens: Vec<Token>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            text: None,
            original_text: None,
            tokens: Vec::new(),
        }
    }

    pub fn with_tokens(mut self, tokens: Vec<Token>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Attach the parsed texts and a fallback token where the error has none.
    pub(crate) fn located(mut self, text: &str, original: &str, token: Option<&Token>) -> Self {
        if self.text.is_none() {
            self.text = Some(text.to_string());
        }
        if self.original_text.is_none() {
            self.original_text = Some(original.to_string());
        }
        if self.tokens.is_empty() {
            self.tokens.extend(token.cloned());
        }
        self
    }

    /// The underline for the error tokens, e.g. `     ^~~^`.
    pub fn arrow(&self) -> Option<String> {
        match &self.text {
            Some(text) if !self.tokens.is_empty() => Some(arrow(text, &self.tokens)),
            _ => None,
        }
    }
}

fn describe(text: &Option<String>, tokens: &[Token]) -> String {
    match text {
        Some(text) if tokens.is_empty() => format!("\n\t{text}"),
        Some(text) => format!("\n\t{text}\n\t{}", arrow(text, tokens)),
        None => String::new(),
    }
}

fn arrow(text: &str, tokens: &[Token]) -> String {
    let column = |byte: usize| text.get(..byte).map_or(0, |s| s.chars().count());

    let mut marks: Vec<char> = Vec::new();
    for token in tokens {
        let start = column(token.span.start);
        let end = column(token.span.end).max(start + 1);
        if marks.len() < end {
            marks.resize(end, ' ');
        }
        for mark in marks.iter_mut().take(end - 1).skip(start + 1) {
            *mark = '~';
        }
        marks[start] = '^';
        marks[end - 1] = '^';
    }
    marks.into_iter().collect()
}
