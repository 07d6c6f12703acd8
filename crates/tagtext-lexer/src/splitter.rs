//! Second pass: split tag bodies into argument parts.

use crate::token::{Span, Token, TokenKind};
use crate::{ESCAPE, SEPARATOR, TAG_START};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    String,
}

/// Split the body of a tag token into its `TagValue` parts.
///
/// Only the interior of the tag is examined: `<` and `>` are skipped, as is the
/// `/` of a close tag or a self-closing tag. Separators inside quotes are kept,
/// and so is a separator followed by `//` so that URLs survive intact.
/// Adjacent separators produce an empty part. The result is never empty.
pub fn split_parts(message: &str, token: &Token) -> Vec<Token> {
    let start = match token.kind {
        TokenKind::CloseTag => token.span.start + 2,
        _ => token.span.start + 1,
    };
    let end = match token.kind {
        TokenKind::OpenCloseTag => token.span.end - 2,
        _ => token.span.end - 1,
    };

    let mut parts = Vec::new();
    let mut state = State::Normal;
    let mut escaped = false;
    let mut quote = '\0';
    let mut marker = start;

    for (offset, c) in message[start..end].char_indices() {
        let i = start + offset;

        if escaped {
            escaped = false;
            continue;
        }

        if c == ESCAPE {
            if let Some(next) = message[i + 1..].chars().next() {
                escaped = match state {
                    State::Normal => next == TAG_START || next == ESCAPE,
                    State::String => next == quote || next == ESCAPE,
                };
                if escaped {
                    continue;
                }
            }
        }

        match state {
            State::Normal => {
                if c == SEPARATOR {
                    if message[i + 1..].starts_with("//") {
                        continue;
                    }
                    parts.push(Token::new(TokenKind::TagValue, Span::new(marker, i)));
                    marker = i + 1;
                } else if c == '\'' || c == '"' {
                    state = State::String;
                    quote = c;
                }
            }
            State::String => {
                if c == quote {
                    state = State::Normal;
                }
            }
        }
    }

    parts.push(Token::new(TokenKind::TagValue, Span::new(marker, end)));
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{scan, TokenCollector};
    use pretty_assertions::assert_eq;

    /// Helper: scan a single tag and split it.
    fn parts(message: &str) -> Vec<&str> {
        let mut collector = TokenCollector::default();
        scan(message, false, &mut collector);
        let tokens = collector.into_tokens();
        let tag = tokens
            .iter()
            .find(|t| t.kind.is_tag())
            .unwrap_or_else(|| panic!("no tag in {message:?}"));
        split_parts(message, tag)
            .iter()
            .map(|t| {
                assert_eq!(t.kind, TokenKind::TagValue);
                t.span.get(message)
            })
            .collect()
    }

    #[test]
    fn test_name_only() {
        assert_eq!(parts("<red>"), vec!["red"]);
    }

    #[test]
    fn test_close_tag_skips_slash() {
        assert_eq!(parts("</red>"), vec!["red"]);
    }

    #[test]
    fn test_self_closing_skips_slash() {
        assert_eq!(parts("<br/>"), vec!["br"]);
    }

    #[test]
    fn test_arguments() {
        assert_eq!(
            parts("<gradient:red:blue:0.5>"),
            vec!["gradient", "red", "blue", "0.5"]
        );
    }

    #[test]
    fn test_close_tag_arguments() {
        assert_eq!(parts("</hover:show_text>"), vec!["hover", "show_text"]);
    }

    #[test]
    fn test_empty_arguments() {
        assert_eq!(parts("<a::b>"), vec!["a", "", "b"]);
        assert_eq!(parts("<:a>"), vec!["", "a"]);
        assert_eq!(parts("<a:>"), vec!["a", ""]);
        assert_eq!(parts("<::>"), vec!["", "", ""]);
    }

    #[test]
    fn test_empty_close_tag() {
        assert_eq!(parts("</>"), vec![""]);
    }

    #[test]
    fn test_quoted_separator() {
        assert_eq!(
            parts("<hover:show_text:'a:b'>"),
            vec!["hover", "show_text", "'a:b'"]
        );
    }

    #[test]
    fn test_escaped_quote_in_argument() {
        assert_eq!(
            parts("<hover:show_text:'it\\'s:ok'>"),
            vec!["hover", "show_text", "'it\\'s:ok'"]
        );
    }

    #[test]
    fn test_url_is_not_split() {
        assert_eq!(
            parts("<click:open_url:https://example.com/a:b>"),
            vec!["click", "open_url", "https://example.com/a", "b"]
        );
    }

    #[test]
    fn test_self_closing_with_arguments() {
        assert_eq!(parts("<key:jump/>"), vec!["key", "jump"]);
    }

    #[test]
    fn test_multibyte_arguments() {
        assert_eq!(parts("<lang:日本:é>"), vec!["lang", "日本", "é"]);
    }
}
