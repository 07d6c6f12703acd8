use tagtext_lexer::Token;

use crate::part::TagPart;
use crate::resolver::{ArgumentQueue, TagResolver};
use crate::tag::Tag;
use crate::ParseError;

/// Looks up tags for the parser.
///
/// `name` is already sanitized (see [`sanitize_name`]); `args` excludes the
/// name. Implementations must not depend on parser state. An error is
/// propagated in strict mode and treated as "no such tag" otherwise.
pub trait TagProvider<C> {
    fn resolve(
        &self,
        name: &str,
        args: &[TagPart],
        token: Option<&Token>,
    ) -> Result<Option<Tag<C>>, ParseError>;

    /// Resolve a bare name, as used for close tags.
    fn resolve_name(&self, name: &str) -> Result<Option<Tag<C>>, ParseError> {
        self.resolve(name, &[], None)
    }
}

/// Normalize a tag name for lookup. Tag names are case-insensitive.
pub fn sanitize_name(name: &str) -> String {
    name.to_lowercase()
}

/// Exposes a [`TagResolver`] as the parser's [`TagProvider`].
pub struct ResolverProvider<'a, C> {
    resolver: &'a dyn TagResolver<C>,
}

impl<'a, C> ResolverProvider<'a, C> {
    pub fn new(resolver: &'a dyn TagResolver<C>) -> Self {
        Self { resolver }
    }

    /// The tag name check used while building trees.
    pub fn has(&self, name: &str) -> bool {
        self.resolver.has(&sanitize_name(name))
    }
}

impl<C> TagProvider<C> for ResolverProvider<'_, C> {
    fn resolve(
        &self,
        name: &str,
        args: &[TagPart],
        token: Option<&Token>,
    ) -> Result<Option<Tag<C>>, ParseError> {
        let mut queue = ArgumentQueue::new(args);
        self.resolver.resolve(name, &mut queue).map_err(|mut err| {
            if err.tokens.is_empty() {
                err.tokens.extend(token.cloned());
            }
            err
        })
    }
}
