//! Escaping helpers.

use crate::{ESCAPE, TAG_START};

/// Escape a string so that it tokenizes as a single literal text token.
///
/// Every `<` and `\` gets a leading `\`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == TAG_START || c == ESCAPE {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    out
}

/// Remove escaping `\` characters from `text[start..end]`.
///
/// A `\` is dropped only when the character after it (inside the range)
/// satisfies `escapes`; the escaped character is then kept as-is.
pub fn unescape(text: &str, start: usize, end: usize, escapes: impl Fn(char) -> bool) -> String {
    let slice = &text[start..end];
    if !slice.contains(ESCAPE) {
        return slice.to_string();
    }

    let mut out = String::with_capacity(slice.len());
    let mut chars = slice.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ESCAPE {
            if let Some(&next) = chars.peek() {
                if escapes(next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text_escapes(c: char) -> bool {
        c == TAG_START || c == ESCAPE
    }

    #[test]
    fn test_escape_plain() {
        assert_eq!(escape("hello"), "hello");
    }

    #[test]
    fn test_escape_tags_and_backslashes() {
        assert_eq!(escape("<red>a\\b"), "\\<red>a\\\\b");
    }

    #[test]
    fn test_unescape_tag_start() {
        let text = "\\<red>";
        assert_eq!(unescape(text, 0, text.len(), text_escapes), "<red>");
    }

    #[test]
    fn test_unescape_keeps_unknown_escapes() {
        let text = "a\\nb";
        assert_eq!(unescape(text, 0, text.len(), text_escapes), "a\\nb");
    }

    #[test]
    fn test_unescape_double_backslash() {
        let text = "a\\\\<b";
        assert_eq!(unescape(text, 0, text.len(), text_escapes), "a\\<b");
    }

    #[test]
    fn test_unescape_trailing_backslash() {
        let text = "a\\";
        assert_eq!(unescape(text, 0, text.len(), text_escapes), "a\\");
    }

    #[test]
    fn test_unescape_respects_range() {
        // The escaped character sits outside the range, so the `\` stays.
        let text = "ab\\<c";
        assert_eq!(unescape(text, 1, 3, text_escapes), "b\\");
    }

    #[test]
    fn test_unescape_custom_predicate() {
        let text = "it\\'s \\<";
        assert_eq!(unescape(text, 0, text.len(), |c| c == '\''), "it's \\<");
    }
}
