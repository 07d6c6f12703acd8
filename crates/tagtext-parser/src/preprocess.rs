//! Textual expansion of pre-process tags.

use tagtext_lexer::{
    is_valid_tag_name, scan, tokenize, MatchedTokenConsumer, Span, TokenKind, SEPARATOR,
};

use crate::part::TagPart;
use crate::provider::{sanitize_name, TagProvider};
use crate::tag::Tag;

/// Upper bound on expansion passes. Stops self-referencing tags.
pub const MAX_PRE_PROCESS_PASSES: usize = 16;

/// Replace every open tag that resolves to [`Tag::PreProcess`] with its text,
/// repeating until the message stops changing.
///
/// Resolution errors leave the tag untouched. When the pass limit is hit, the
/// input of the last pass is returned.
pub fn resolve_pre_process_tags<C>(message: &str, provider: &dyn TagProvider<C>) -> String {
    let mut current = message.to_string();
    for pass in 1..=MAX_PRE_PROCESS_PASSES {
        let mut consumer = StringResolvingConsumer::new(&current, provider);
        scan(&current, false, &mut consumer);
        let next = consumer.output;
        if next == current || pass == MAX_PRE_PROCESS_PASSES {
            break;
        }
        current = next;
    }
    current
}

/// Copies the scanned message, substituting pre-process tags.
struct StringResolvingConsumer<'a, C> {
    input: &'a str,
    provider: &'a dyn TagProvider<C>,
    output: String,
}

impl<'a, C> StringResolvingConsumer<'a, C> {
    fn new(input: &'a str, provider: &'a dyn TagProvider<C>) -> Self {
        Self {
            input,
            provider,
            output: String::with_capacity(input.len()),
        }
    }

    fn replacement(&self, matched: &str) -> Option<String> {
        let body = &matched[1..matched.len() - 1];
        let name = body.split_once(SEPARATOR).map_or(body, |(name, _)| name);
        if !is_valid_tag_name(name) {
            return None;
        }

        let tokens = tokenize(matched, true);
        let token = tokens.first()?;
        let args: Vec<TagPart> = token
            .children
            .iter()
            .skip(1)
            .map(|child| TagPart::resolved(matched, child, self.provider))
            .collect();

        match self.provider.resolve(&sanitize_name(name), &args, Some(token)) {
            Ok(Some(Tag::PreProcess(text))) => Some(text),
            _ => None,
        }
    }
}

impl<C> MatchedTokenConsumer for StringResolvingConsumer<'_, C> {
    fn accept(&mut self, span: Span, kind: TokenKind) {
        let matched = span.get(self.input);
        if kind == TokenKind::OpenTag {
            if let Some(text) = self.replacement(matched) {
                self.output.push_str(&text);
                return;
            }
        }
        self.output.push_str(matched);
    }
}
