//! Parser entry point.

use tagtext_lexer::tokenize;

use crate::builder::build_tree;
use crate::preprocess::resolve_pre_process_tags;
use crate::provider::ResolverProvider;
use crate::resolver::TagResolver;
use crate::trace::Trace;
use crate::tree::Tree;
use crate::ParseError;

/// Parses messages against a tag resolver.
///
/// ```
/// use tagtext_parser::resolver::Resolvers;
/// use tagtext_parser::{Parser, Tag};
///
/// let tags: Resolvers<String> = Resolvers::builder()
///     .tag("red", || Tag::inserting("red".to_string()))
///     .build();
/// let tree = Parser::new(&tags).parse("<red>hi</red>").unwrap();
/// assert_eq!(tree.root().children().count(), 1);
///
/// let err = Parser::new(&tags).strict(true).parse("<red>hi").unwrap_err();
/// assert!(err.message.starts_with("All tags must be explicitly closed"));
/// ```
pub struct Parser<'a, C> {
    resolver: &'a dyn TagResolver<C>,
    strict: bool,
    debug: Option<Box<dyn FnMut(&str) + 'a>>,
}

impl<'a, C> Parser<'a, C> {
    pub fn new(resolver: &'a dyn TagResolver<C>) -> Self {
        Self {
            resolver,
            strict: false,
            debug: None,
        }
    }

    /// In strict mode, unclosed tags, out-of-order closes, `<reset>` and tag
    /// resolution failures are errors instead of being read as text.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Receive a line for every parse step.
    pub fn debug_output(mut self, sink: impl FnMut(&str) + 'a) -> Self {
        self.debug = Some(Box::new(sink));
        self
    }

    pub fn parse(&mut self, message: &str) -> Result<Tree<C>, ParseError> {
        let mut trace = match self.debug.as_deref_mut() {
            Some(sink) => Trace::new(sink),
            None => Trace::silent(),
        };
        trace.line(|| format!("Beginning parsing message {message}"));

        let provider = ResolverProvider::new(self.resolver);
        let processed = resolve_pre_process_tags(message, &provider);
        let tokens = tokenize(&processed, false);
        let checker = |name: &str| provider.has(name);
        let tree = build_tree(
            &provider,
            &checker,
            &tokens,
            &processed,
            message,
            self.strict,
            &mut trace,
        )?;

        trace.line(|| format!("Text parsed into element tree:\n{tree}"));
        Ok(tree)
    }
}
