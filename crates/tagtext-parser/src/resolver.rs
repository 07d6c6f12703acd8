//! Tag registries.
//!
//! A [`TagResolver`] maps a sanitized tag name plus its arguments to a
//! [`Tag`]. Small resolvers are combined with [`TagResolverBuilder`]:
//!
//! ```
//! use tagtext_parser::resolver::{self, Resolvers};
//! use tagtext_parser::{Tag, TagResolver};
//!
//! let tags: Resolvers<String> = Resolvers::builder()
//!     .tag("red", || Tag::inserting("red".to_string()))
//!     .resolver(resolver::reset())
//!     .build();
//! assert!(tags.has("red"));
//! assert!(tags.has("reset"));
//! ```

use tagtext_lexer::is_valid_tag_name;

use crate::part::TagPart;
use crate::tag::Tag;
use crate::ParseError;

/// Resolves tags by name.
pub trait TagResolver<C> {
    /// Resolve `name` (already lowercase) with the tag's arguments.
    ///
    /// `Ok(None)` means the name is not handled here.
    fn resolve(
        &self,
        name: &str,
        args: &mut ArgumentQueue<'_>,
    ) -> Result<Option<Tag<C>>, ParseError>;

    /// Whether this resolver might produce a tag for `name`.
    fn has(&self, name: &str) -> bool;
}

/// Cursor over a tag's arguments.
#[derive(Debug, Clone)]
pub struct ArgumentQueue<'a> {
    args: &'a [TagPart],
    index: usize,
}

impl<'a> ArgumentQueue<'a> {
    pub fn new(args: &'a [TagPart]) -> Self {
        Self { args, index: 0 }
    }

    /// Take the next argument, failing when there is none.
    pub fn pop(&mut self) -> Result<&'a TagPart, ParseError> {
        self.pop_or("Missing argument for this tag")
    }

    /// Take the next argument, failing with `message` when there is none.
    pub fn pop_or(&mut self, message: impl Into<String>) -> Result<&'a TagPart, ParseError> {
        match self.args.get(self.index) {
            Some(arg) => {
                self.index += 1;
                Ok(arg)
            }
            None => Err(ParseError::new(message)
                .with_tokens(self.args.iter().map(|arg| arg.token().clone()).collect())),
        }
    }

    pub fn peek(&self) -> Option<&'a TagPart> {
        self.args.get(self.index)
    }

    pub fn has_next(&self) -> bool {
        self.index < self.args.len()
    }

    /// Arguments not yet popped.
    pub fn remaining(&self) -> &'a [TagPart] {
        &self.args[self.index..]
    }

    /// Rewind to the first argument.
    pub fn reset(&mut self) {
        self.index = 0;
    }
}

// ============================================================================
// Resolvers
// ============================================================================

/// Resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

impl<C> TagResolver<C> for Empty {
    fn resolve(
        &self,
        _name: &str,
        _args: &mut ArgumentQueue<'_>,
    ) -> Result<Option<Tag<C>>, ParseError> {
        Ok(None)
    }

    fn has(&self, _name: &str) -> bool {
        false
    }
}

/// One name, no arguments.
pub struct Single<C> {
    key: String,
    factory: Box<dyn Fn() -> Tag<C>>,
}

impl<C> TagResolver<C> for Single<C> {
    fn resolve(
        &self,
        name: &str,
        args: &mut ArgumentQueue<'_>,
    ) -> Result<Option<Tag<C>>, ParseError> {
        if name != self.key {
            return Ok(None);
        }
        if args.has_next() {
            return Err(ParseError::new(format!(
                "Tag '<{name}>' does not accept any arguments"
            )));
        }
        Ok(Some((self.factory)()))
    }

    fn has(&self, name: &str) -> bool {
        name == self.key
    }
}

type HandlerFn<C> = dyn Fn(&str, &mut ArgumentQueue<'_>) -> Result<Tag<C>, ParseError>;

/// A set of names sharing one argument-aware handler.
pub struct Handler<C> {
    names: Vec<String>,
    handler: Box<HandlerFn<C>>,
}

impl<C> TagResolver<C> for Handler<C> {
    fn resolve(
        &self,
        name: &str,
        args: &mut ArgumentQueue<'_>,
    ) -> Result<Option<Tag<C>>, ParseError> {
        if !self.has(name) {
            return Ok(None);
        }
        (self.handler)(name, args).map(Some)
    }

    fn has(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

fn checked_key(key: &str) -> String {
    assert!(is_valid_tag_name(key), "invalid tag name: {key:?}");
    key.to_lowercase()
}

pub fn empty() -> Empty {
    Empty
}

/// A resolver for a single argument-less tag.
///
/// # Panics
///
/// Panics if `key` is not a valid tag name.
pub fn single<C: 'static>(key: &str, factory: impl Fn() -> Tag<C> + 'static) -> Single<C> {
    Single {
        key: checked_key(key),
        factory: Box::new(factory),
    }
}

/// A resolver handling every name in `names` with `handler`.
///
/// # Panics
///
/// Panics if any name is not a valid tag name.
pub fn handler<C: 'static>(
    names: &[&str],
    handler: impl Fn(&str, &mut ArgumentQueue<'_>) -> Result<Tag<C>, ParseError> + 'static,
) -> Handler<C> {
    Handler {
        names: names.iter().map(|name| checked_key(name)).collect(),
        handler: Box::new(handler),
    }
}

/// The `<reset>` directive.
pub fn reset<C: 'static>() -> Single<C> {
    single("reset", || Tag::Reset)
}

/// A tag replaced by `text` before parsing.
///
/// # Panics
///
/// Panics if `key` is not a valid tag name.
pub fn pre_process<C: 'static>(key: &str, text: impl Into<String>) -> Single<C> {
    let text = text.into();
    single(key, move || Tag::PreProcess(text.clone()))
}

// ============================================================================
// Combined resolvers
// ============================================================================

/// Several resolvers queried as one. Later entries shadow earlier ones.
pub struct Resolvers<C> {
    resolvers: Vec<Box<dyn TagResolver<C>>>,
}

impl<C: 'static> Resolvers<C> {
    pub fn builder() -> TagResolverBuilder<C> {
        TagResolverBuilder::new()
    }
}

impl<C> TagResolver<C> for Resolvers<C> {
    fn resolve(
        &self,
        name: &str,
        args: &mut ArgumentQueue<'_>,
    ) -> Result<Option<Tag<C>>, ParseError> {
        for resolver in self.resolvers.iter().rev() {
            if resolver.has(name) {
                args.reset();
                return resolver.resolve(name, args);
            }
        }
        Ok(None)
    }

    fn has(&self, name: &str) -> bool {
        self.resolvers.iter().any(|r| r.has(name))
    }
}

pub struct TagResolverBuilder<C> {
    resolvers: Vec<Box<dyn TagResolver<C>>>,
}

impl<C: 'static> TagResolverBuilder<C> {
    pub fn new() -> Self {
        Self {
            resolvers: Vec::new(),
        }
    }

    /// Register a single argument-less tag.
    pub fn tag(self, key: &str, factory: impl Fn() -> Tag<C> + 'static) -> Self {
        self.resolver(single(key, factory))
    }

    pub fn resolver(mut self, resolver: impl TagResolver<C> + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn build(self) -> Resolvers<C> {
        Resolvers {
            resolvers: self.resolvers,
        }
    }
}

impl<C: 'static> Default for TagResolverBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tagtext_lexer::{Span, Token, TokenKind};

    fn args(message: &str, spans: &[(usize, usize)]) -> Vec<TagPart> {
        spans
            .iter()
            .map(|&(start, end)| {
                TagPart::new(message, &Token::new(TokenKind::TagValue, Span::new(start, end)))
            })
            .collect()
    }

    fn inserted(tag: Option<Tag<String>>) -> String {
        match tag {
            Some(Tag::Inserting(inserting)) => inserting.value(),
            other => panic!("Expected Inserting, got {other:?}"),
        }
    }

    // ========================================================================
    // ArgumentQueue
    // ========================================================================

    #[test]
    fn test_queue_pop_and_peek() {
        let parts = args("a:b", &[(0, 1), (2, 3)]);
        let mut queue = ArgumentQueue::new(&parts);
        assert!(queue.has_next());
        assert_eq!(queue.peek().unwrap().value(), "a");
        assert_eq!(queue.pop().unwrap().value(), "a");
        assert_eq!(queue.remaining().len(), 1);
        assert_eq!(queue.pop().unwrap().value(), "b");
        assert!(!queue.has_next());
        assert_eq!(queue.peek(), None);

        queue.reset();
        assert_eq!(queue.pop().unwrap().value(), "a");
    }

    #[test]
    fn test_queue_missing_argument() {
        let parts = args("a", &[(0, 1)]);
        let mut queue = ArgumentQueue::new(&parts);
        queue.pop().unwrap();
        let err = queue.pop().unwrap_err();
        assert_eq!(err.message, "Missing argument for this tag");
        assert_eq!(err.tokens.len(), 1);

        let err = queue.pop_or("need a color").unwrap_err();
        assert_eq!(err.message, "need a color");
    }

    // ========================================================================
    // Resolvers
    // ========================================================================

    #[test]
    fn test_empty_resolver() {
        let r = empty();
        assert!(!TagResolver::<String>::has(&r, "red"));
        let result: Option<Tag<String>> = r.resolve("red", &mut ArgumentQueue::new(&[])).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_single_resolver() {
        let r = single("Red", || Tag::inserting("red".to_string()));
        assert!(r.has("red"));
        assert!(!r.has("blue"));
        assert_eq!(inserted(r.resolve("red", &mut ArgumentQueue::new(&[])).unwrap()), "red");
        assert!(r.resolve("blue", &mut ArgumentQueue::new(&[])).unwrap().is_none());
    }

    #[test]
    fn test_single_rejects_arguments() {
        let r = single("red", || Tag::inserting("red".to_string()));
        let parts = args("x", &[(0, 1)]);
        let err = r.resolve("red", &mut ArgumentQueue::new(&parts)).unwrap_err();
        assert_eq!(err.message, "Tag '<red>' does not accept any arguments");
    }

    #[test]
    #[should_panic(expected = "invalid tag name")]
    fn test_single_invalid_name_panics() {
        let _ = single::<String>("a b", || Tag::Reset);
    }

    #[test]
    fn test_handler_resolver() {
        let r = handler(&["color", "c"], |name, args| {
            let color = args.pop_or(format!("{name} needs a color"))?;
            Ok(Tag::inserting(color.value().to_string()))
        });
        assert!(r.has("c"));

        let parts = args("blue", &[(0, 4)]);
        let tag = r.resolve("color", &mut ArgumentQueue::new(&parts)).unwrap();
        assert_eq!(inserted(tag), "blue");

        let err = r.resolve("c", &mut ArgumentQueue::new(&[])).unwrap_err();
        assert_eq!(err.message, "c needs a color");
    }

    #[test]
    fn test_reset_and_pre_process() {
        let r = reset::<String>();
        let tag = r.resolve("reset", &mut ArgumentQueue::new(&[])).unwrap();
        assert!(tag.unwrap().is_reset());

        let r = pre_process::<String>("greet", "<red>hi");
        match r.resolve("greet", &mut ArgumentQueue::new(&[])).unwrap() {
            Some(Tag::PreProcess(text)) => assert_eq!(text, "<red>hi"),
            other => panic!("Expected PreProcess, got {other:?}"),
        }
    }

    #[test]
    fn test_builder_later_registration_wins() {
        let tags = Resolvers::builder()
            .tag("red", || Tag::inserting("first".to_string()))
            .tag("blue", || Tag::inserting("blue".to_string()))
            .tag("red", || Tag::inserting("second".to_string()))
            .build();
        assert_eq!(inserted(tags.resolve("red", &mut ArgumentQueue::new(&[])).unwrap()), "second");
        assert_eq!(inserted(tags.resolve("blue", &mut ArgumentQueue::new(&[])).unwrap()), "blue");
        assert!(tags.resolve("green", &mut ArgumentQueue::new(&[])).unwrap().is_none());
        assert!(!tags.has("green"));
    }

    #[test]
    fn test_builder_resets_queue_between_resolvers() {
        let tags = Resolvers::builder()
            .resolver(handler(&["echo"], |_, args| {
                Ok(Tag::inserting(args.pop()?.value().to_string()))
            }))
            .build();
        let parts = args("x", &[(0, 1)]);
        let mut queue = ArgumentQueue::new(&parts);
        queue.pop().unwrap();
        assert_eq!(inserted(tags.resolve("echo", &mut queue).unwrap()), "x");
    }
}
