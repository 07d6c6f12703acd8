use tagtext_lexer::{unescape, Token, ESCAPE, TAG_START};

use crate::preprocess::resolve_pre_process_tags;
use crate::provider::TagProvider;

/// One `:`-separated part of a tag, with quotes and escapes removed.
///
/// Part 0 of a tag is its name; the rest are the tag's arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct TagPart {
    value: String,
    token: Token,
}

impl TagPart {
    pub fn new(message: &str, token: &Token) -> Self {
        Self {
            value: unquote_and_escape(message, token.span.start, token.span.end),
            token: token.clone(),
        }
    }

    /// Like [`TagPart::new`], but pre-process tags inside the value are
    /// expanded, so `'<name>'` can be used as an argument.
    pub fn resolved<C>(message: &str, token: &Token, provider: &dyn TagProvider<C>) -> Self {
        let mut part = Self::new(message, token);
        if part.value.contains(TAG_START) {
            part.value = resolve_pre_process_tags(&part.value, provider);
        }
        part
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The `TagValue` token this part was read from.
    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn lower_value(&self) -> String {
        self.value.to_lowercase()
    }

    /// `true` or `on`.
    pub fn is_true(&self) -> bool {
        self.value == "true" || self.value == "on"
    }

    /// `false` or `off`.
    pub fn is_false(&self) -> bool {
        self.value == "false" || self.value == "off"
    }

    pub fn as_int(&self) -> Option<i32> {
        self.value.parse().ok()
    }

    pub fn as_double(&self) -> Option<f64> {
        self.value.parse().ok()
    }
}

/// Read `text[start..end]` as a tag part value.
///
/// A value wrapped in matching quotes loses the quotes, and escapes of that
/// quote or of `\` are removed. An unquoted value only loses escapes of `<`
/// and `\`.
pub fn unquote_and_escape(text: &str, start: usize, end: usize) -> String {
    let slice = &text[start..end];
    match slice.chars().next() {
        Some(quote @ ('\'' | '"')) if slice.len() >= 2 && slice.ends_with(quote) => {
            unescape(text, start + 1, end - 1, |c| c == quote || c == ESCAPE)
        }
        _ => unescape(text, start, end, |c| c == TAG_START || c == ESCAPE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagtext_lexer::{Span, TokenKind};

    fn part(text: &str) -> TagPart {
        TagPart::new(text, &Token::new(TokenKind::TagValue, Span::new(0, text.len())))
    }

    #[test]
    fn test_plain_value() {
        assert_eq!(part("show_text").value(), "show_text");
    }

    #[test]
    fn test_empty_value() {
        assert_eq!(part("").value(), "");
    }

    #[test]
    fn test_single_quoted() {
        assert_eq!(part("'hello world'").value(), "hello world");
    }

    #[test]
    fn test_double_quoted() {
        assert_eq!(part("\"x\"").value(), "x");
    }

    #[test]
    fn test_quoted_escapes() {
        assert_eq!(part("'it\\'s'").value(), "it's");
        assert_eq!(part("'a\\\\b'").value(), "a\\b");
        // other escapes stay
        assert_eq!(part("'\\<b>'").value(), "\\<b>");
    }

    #[test]
    fn test_mismatched_quotes_are_kept() {
        assert_eq!(part("'x\"").value(), "'x\"");
        assert_eq!(part("'").value(), "'");
    }

    #[test]
    fn test_unquoted_escapes() {
        assert_eq!(part("a\\<b").value(), "a<b");
        assert_eq!(part("a\\'b").value(), "a\\'b");
    }

    #[test]
    fn test_argument_helpers() {
        assert!(part("true").is_true());
        assert!(part("on").is_true());
        assert!(part("false").is_false());
        assert!(part("off").is_false());
        assert!(!part("yes").is_true());
        assert_eq!(part("42").as_int(), Some(42));
        assert_eq!(part("-3").as_int(), Some(-3));
        assert_eq!(part("x").as_int(), None);
        assert_eq!(part("0.5").as_double(), Some(0.5));
        assert_eq!(part("Show_Text").lower_value(), "show_text");
    }

    #[test]
    fn test_part_keeps_token() {
        let p = part("abc");
        assert_eq!(p.token().span, Span::new(0, 3));
    }
}
