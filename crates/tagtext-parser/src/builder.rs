//! Builds a [`Tree`] from the token stream.
//!
//! One forward pass over the tokens. The builder keeps a "current" node that
//! new children are appended to; open tags that take children become current,
//! and close tags walk up the parent chain to find what they close.

use tagtext_lexer::{is_valid_tag_name, unescape, Token, TokenKind, ESCAPE, TAG_START};

use crate::part::{unquote_and_escape, TagPart};
use crate::provider::{sanitize_name, TagProvider};
use crate::tag::Tag;
use crate::trace::Trace;
use crate::tree::{NodeId, Tree};
use crate::ParseError;

/// Build the node tree for `tokens`.
///
/// `tag_name_checker` decides whether a name is worth resolving at all.
/// `message` is the text the tokens were produced from; `original_message` is
/// what the caller passed in before pre-processing.
pub fn build_tree<C>(
    provider: &dyn TagProvider<C>,
    tag_name_checker: &dyn Fn(&str) -> bool,
    tokens: &[Token],
    message: &str,
    original_message: &str,
    strict: bool,
    trace: &mut Trace<'_>,
) -> Result<Tree<C>, ParseError> {
    let mut builder = TreeBuilder {
        provider,
        tag_name_checker,
        message,
        original_message,
        strict,
        tree: Tree::new(message, original_message),
        current: NodeId::ROOT,
    };

    for token in tokens {
        match token.kind {
            TokenKind::Text => builder.push_text(token),
            TokenKind::OpenTag | TokenKind::OpenCloseTag => builder.open_tag(token, trace)?,
            TokenKind::CloseTag => builder.close_tag(token)?,
            TokenKind::TagValue => {}
        }
    }

    builder.finish()
}

struct TreeBuilder<'a, C> {
    provider: &'a dyn TagProvider<C>,
    tag_name_checker: &'a dyn Fn(&str) -> bool,
    message: &'a str,
    original_message: &'a str,
    strict: bool,
    tree: Tree<C>,
    current: NodeId,
}

impl<C> TreeBuilder<'_, C> {
    fn error(&self, message: String, tokens: Vec<Token>) -> ParseError {
        ParseError::new(message)
            .with_tokens(tokens)
            .located(self.message, self.original_message, None)
    }

    /// Append `token` as literal text under the current node.
    fn push_text(&mut self, token: &Token) {
        let text = unescape(self.message, token.span.start, token.span.end, |c| {
            c == TAG_START || c == ESCAPE
        });
        self.tree.push_text(self.current, token.clone(), text);
    }

    fn column(&self, token: &Token) -> usize {
        self.message[..token.span.start].chars().count()
    }

    fn open_tag(&mut self, token: &Token, trace: &mut Trace<'_>) -> Result<(), ParseError> {
        let Some(name_token) = token.children.first() else {
            self.push_text(token);
            return Ok(());
        };
        if !is_valid_tag_name(name_token.text(self.message)) {
            self.push_text(token);
            return Ok(());
        }

        let parts: Vec<TagPart> = token
            .children
            .iter()
            .map(|child| TagPart::resolved(self.message, child, self.provider))
            .collect();
        if !(self.tag_name_checker)(parts[0].value()) {
            self.push_text(token);
            return Ok(());
        }

        match self.resolve(&parts, token, trace)? {
            None => self.push_text(token),
            Some(Tag::Reset) => {
                if self.strict {
                    return Err(self.error(
                        "<reset> tags are not allowed when strict mode is enabled".to_string(),
                        vec![token.clone()],
                    ));
                }
                self.current = NodeId::ROOT;
            }
            Some(tag) => {
                let descend = token.kind == TokenKind::OpenTag && tag.allows_children();
                let id = self.tree.push_tag(self.current, token.clone(), parts, tag);
                if descend {
                    self.current = id;
                }
            }
        }
        Ok(())
    }

    /// Ask the provider for the tag. Errors only escape in strict mode.
    fn resolve(
        &self,
        parts: &[TagPart],
        token: &Token,
        trace: &mut Trace<'_>,
    ) -> Result<Option<Tag<C>>, ParseError> {
        let name = parts[0].value();
        trace.line(|| {
            format!(
                "Attempting to match node '{name}' at column {}",
                self.column(token)
            )
        });

        match self.provider.resolve(&sanitize_name(name), &parts[1..], Some(token)) {
            Ok(Some(tag)) => {
                trace.line(|| {
                    format!("Successfully matched node '{name}' to tag {}", tag.kind_name())
                });
                Ok(Some(tag))
            }
            Ok(None) => {
                trace.line(|| format!("Could not match node '{name}'"));
                Ok(None)
            }
            Err(err) => {
                trace.line(|| format!("Could not match node '{name}' - {}", err.message));
                if self.strict {
                    Err(err.located(self.message, self.original_message, Some(token)))
                } else {
                    Ok(None)
                }
            }
        }
    }

    fn close_tag(&mut self, token: &Token) -> Result<(), ParseError> {
        let close: Vec<String> = token
            .children
            .iter()
            .map(|child| unquote_and_escape(self.message, child.span.start, child.span.end))
            .collect();
        let Some(close_name) = close.first() else {
            self.push_text(token);
            return Ok(());
        };

        if !(self.tag_name_checker)(close_name) {
            self.push_text(token);
            return Ok(());
        }
        // Closing a reset means nothing.
        if let Ok(Some(Tag::Reset)) = self.provider.resolve_name(&sanitize_name(close_name)) {
            return Ok(());
        }

        let Some(matched) = self.find_open(&close) else {
            // A close tag that matches nothing is never an error.
            self.push_text(token);
            return Ok(());
        };

        if self.strict && matched != self.current {
            let open = self.tree.get(matched);
            let current = self.tree.get(self.current);
            let current_name = current.as_tag().map_or("", |tag| tag.name());
            let tokens = [open.token(), current.token()]
                .into_iter()
                .flatten()
                .cloned()
                .chain(std::iter::once(token.clone()))
                .collect();
            return Err(self.error(
                format!(
                    "Unclosed tag encountered; {current_name} is not closed, because {close_name} was closed first."
                ),
                tokens,
            ));
        }

        self.current = self
            .tree
            .get(matched)
            .parent()
            .map_or(NodeId::ROOT, |parent| parent.id());
        Ok(())
    }

    /// The nearest open tag, from the current node upward, that `close` closes.
    fn find_open(&self, close: &[String]) -> Option<NodeId> {
        let mut node = Some(self.tree.get(self.current));
        while let Some(candidate) = node {
            let tag = candidate.as_tag()?;
            if tag_closes(close, tag.parts()) {
                return Some(candidate.id());
            }
            node = candidate.parent();
        }
        None
    }

    fn finish(self) -> Result<Tree<C>, ParseError> {
        if !self.strict || self.current == NodeId::ROOT {
            return Ok(self.tree);
        }

        let mut open: Vec<_> = std::iter::successors(Some(self.tree.get(self.current)), |node| {
            node.parent()
        })
        .filter_map(|node| Some((node.as_tag()?.name().to_string(), node.token()?.clone())))
        .collect();
        open.reverse();

        let names: Vec<&str> = open.iter().map(|(name, _)| name.as_str()).collect();
        let message = format!(
            "All tags must be explicitly closed while in strict mode. End of string found with open tags: {}",
            names.join(", ")
        );
        let tokens = open.iter().map(|(_, token)| token.clone()).collect();
        Err(self.error(message, tokens))
    }
}

/// Whether a close tag's parts close an open tag.
///
/// The name compares case-insensitively and every further close part must
/// equal the open part at the same position. A close tag may name fewer parts
/// than the open tag, never more.
fn tag_closes(close: &[String], open: &[TagPart]) -> bool {
    if close.is_empty() || close.len() > open.len() {
        return false;
    }
    if close[0].to_lowercase() != open[0].value().to_lowercase() {
        return false;
    }
    close[1..]
        .iter()
        .zip(&open[1..])
        .all(|(close, open)| close == open.value())
}
