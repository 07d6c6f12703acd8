//! Escaping and stripping of known tags.
//!
//! Both helpers only touch tags whose name `is_known` accepts; text, escapes
//! and unknown tags pass through unchanged.

use tagtext_lexer::{escape, is_valid_tag_name, tokenize, Token};

use crate::part::unquote_and_escape;

fn is_known_tag(input: &str, token: &Token, is_known: &dyn Fn(&str) -> bool) -> bool {
    if !token.kind.is_tag() {
        return false;
    }
    let Some(name) = token.children.first() else {
        return false;
    };
    is_valid_tag_name(name.text(input))
        && is_known(&unquote_and_escape(input, name.span.start, name.span.end))
}

/// Escape known tags so they read as literal text.
pub fn escape_tags(input: &str, is_known: &dyn Fn(&str) -> bool) -> String {
    let mut out = String::with_capacity(input.len());
    for token in tokenize(input, true) {
        let text = token.text(input);
        if is_known_tag(input, &token, is_known) {
            out.push_str(&escape(text));
        } else {
            out.push_str(text);
        }
    }
    out
}

/// Remove known tags.
pub fn strip_tags(input: &str, is_known: &dyn Fn(&str) -> bool) -> String {
    tokenize(input, true)
        .iter()
        .filter(|token| !is_known_tag(input, token, is_known))
        .map(|token| token.text(input))
        .collect()
}
