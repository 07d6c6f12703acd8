//! tagtext Lexer
//!
//! Tokenizes tagtext markup (`<red>Hello</red> <hover:show_text:'hi'>world`)
//! into a flat stream of text and tag tokens. Tokenizing runs in two passes:
//! the scanner finds tag boundaries while honoring escapes and quotes, then the
//! splitter breaks every tag body into its `:`-separated argument parts.
//!
//! # Example
//!
//! ```
//! use tagtext_lexer::{tokenize, TokenKind};
//!
//! let tokens = tokenize("<red>hi", false);
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].kind, TokenKind::OpenTag);
//! assert_eq!(tokens[1].kind, TokenKind::Text);
//! ```

pub mod escape;
pub mod scanner;
pub mod splitter;
pub mod token;

pub use escape::{escape, unescape};
pub use scanner::{scan, MatchedTokenConsumer, TokenCollector};
pub use splitter::split_parts;
pub use token::{Span, Token, TokenKind};

/// Opens a tag.
pub const TAG_START: char = '<';
/// Ends a tag.
pub const TAG_END: char = '>';
/// Marks a closing tag (`</name>`) or a self-closing tag (`<name/>`).
pub const CLOSE_TAG: char = '/';
/// Separates tag arguments.
pub const SEPARATOR: char = ':';
/// Escapes the next character.
pub const ESCAPE: char = '\\';

/// Tokenize a message into its final, immutable token list.
///
/// `lenient` is for callers that only escape or strip tags; it silences the
/// legacy formatting code warnings the scanner would otherwise log.
pub fn tokenize(message: &str, lenient: bool) -> Vec<Token> {
    let mut collector = TokenCollector::default();
    scan(message, lenient, &mut collector);

    collector
        .into_tokens()
        .into_iter()
        .map(|token| {
            if token.kind.is_tag() {
                let children = split_parts(message, &token);
                token.with_children(children)
            } else {
                token
            }
        })
        .collect()
}

/// Whether a character may appear in a tag name (after ASCII lowercasing).
fn is_tag_name_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '_' | '-')
}

/// Check a raw tag name against the allowed syntax `[!?#]?[a-z0-9_-]*`.
///
/// Names are case-insensitive, so upper-case ASCII letters are accepted.
pub fn is_valid_tag_name(name: &str) -> bool {
    let rest = name
        .strip_prefix(['!', '?', '#'])
        .unwrap_or(name);
    rest.chars().all(|c| is_tag_name_char(c.to_ascii_lowercase()))
}
