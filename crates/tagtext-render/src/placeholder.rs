//! Placeholder resolvers.
//!
//! Placeholders are self-closing: `<name>` never wraps the markup after it.

use tagtext_parser::resolver::{self, Single};
use tagtext_parser::Tag;

use crate::Component;

/// `<key>` is replaced by `markup` before parsing, so tags inside it apply.
pub fn parsed<C: 'static>(key: &str, markup: impl Into<String>) -> Single<C> {
    resolver::pre_process(key, markup)
}

/// `<key>` inserts `text` literally. Tags inside it are not parsed.
pub fn unparsed<C>(key: &str, text: impl Into<String>) -> Single<C>
where
    C: Component + Clone + 'static,
{
    component(key, C::text(&text.into()))
}

/// `<key>` inserts a ready-made component.
pub fn component<C>(key: &str, value: C) -> Single<C>
where
    C: Clone + 'static,
{
    resolver::single(key, move || Tag::self_closing_inserting(value.clone()))
}
