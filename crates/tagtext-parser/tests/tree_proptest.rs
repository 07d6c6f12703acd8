//! Property-based tests for tree building
//!
//! With every tag name recognized:
//! - escaped text parses to a single text node holding the original string
//! - an explicit close tag at the end changes nothing in lenient mode
//! - strict mode rejects the unclosed form and accepts the closed one

use proptest::prelude::*;
use tagtext_lexer::escape;
use tagtext_parser::{ArgumentQueue, ParseError, Parser, Tag, TagResolver, Tree};

/// Recognizes every name as an inserting tag.
struct AnyTag;

impl TagResolver<String> for AnyTag {
    fn resolve(
        &self,
        _name: &str,
        _args: &mut ArgumentQueue<'_>,
    ) -> Result<Option<Tag<String>>, ParseError> {
        Ok(Some(Tag::inserting(String::new())))
    }

    fn has(&self, _name: &str) -> bool {
        true
    }
}

/// Generate strings that lean heavily on markup characters
fn markup_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<String>(),
        "[<>/:\\\\'\"a-z ]{0,40}",
        "(<[a-z]{0,5}(:[a-z'\"]{0,4})*/?>|</[a-z]{0,5}>|[a-z ]{0,5}|\\\\){0,8}",
    ]
}

fn parse(message: &str, strict: bool) -> Result<Tree<String>, ParseError> {
    Parser::new(&AnyTag).strict(strict).parse(message)
}

proptest! {
    #[test]
    fn escaped_text_is_one_text_node(s in markup_strategy()) {
        let tree = parse(&escape(&s), false).unwrap();
        let children: Vec<_> = tree.root().children().collect();
        prop_assert_eq!(children.len(), 1);
        prop_assert_eq!(children[0].as_text(), Some(s.as_str()));
    }

    #[test]
    fn closing_the_last_tag_changes_nothing(
        name in "[a-z][a-z0-9_-]{0,8}",
        body in "[^<\\\\]{0,20}",
    ) {
        let closed = parse(&format!("<{name}>{body}</{name}>"), false).unwrap();
        let unclosed = parse(&format!("<{name}>{body}"), false).unwrap();
        prop_assert_eq!(closed.to_string(), unclosed.to_string());
    }

    #[test]
    fn strict_requires_the_close_tag(
        name in "[a-z][a-z0-9_-]{0,8}",
        body in "[^<\\\\]{0,20}",
    ) {
        let unclosed = format!("<{name}>{body}");
        let closed = format!("<{name}>{body}</{name}>");
        prop_assert!(parse(&unclosed, true).is_err());
        prop_assert!(parse(&closed, true).is_ok());
    }
}
