//! Tag capabilities.
//!
//! A resolved tag is one of a fixed set of behaviors. The parser only needs to
//! know whether a tag takes children and whether it is the `<reset>`
//! directive; the renderer asks inserting tags for values and lets modifying
//! tags transform their content.

use std::fmt;

use crate::tree::NodeRef;

/// A tag that produces a value of the output type `C`.
pub trait Inserting<C> {
    fn value(&self) -> C;

    /// Whether markup following this tag nests inside it until it is closed.
    fn allows_children(&self) -> bool {
        true
    }
}

/// A tag that transforms the content nested inside it.
///
/// Rendering calls `visit` for the tag's node and every node below it before
/// any value is produced (so the tag can measure its content), then
/// `post_visit` once, then `apply` for the tag's rendered value and each of its
/// descendants. Implementations keep per-parse state behind interior
/// mutability.
pub trait Modifying<C> {
    fn visit(&self, node: NodeRef<'_, C>, depth: usize) {
        let _ = (node, depth);
    }

    fn post_visit(&self) {}

    /// Transform one rendered value. `current` never carries children; those
    /// are passed in their own `apply` calls at `depth + 1`.
    fn apply(&self, current: C, depth: usize) -> C;
}

/// A resolved tag.
pub enum Tag<C> {
    Inserting(Box<dyn Inserting<C>>),
    Modifying(Box<dyn Modifying<C>>),
    /// Replaced textually by the string before the main parse.
    PreProcess(String),
    /// Closes every open tag. Never appears in a tree.
    Reset,
}

/// An inserting tag holding a fixed value.
struct Insert<C> {
    value: C,
    allows_children: bool,
}

impl<C: Clone> Inserting<C> for Insert<C> {
    fn value(&self) -> C {
        self.value.clone()
    }

    fn allows_children(&self) -> bool {
        self.allows_children
    }
}

impl<C> Tag<C> {
    /// An inserting tag whose value wraps the markup nested inside it.
    pub fn inserting(value: C) -> Self
    where
        C: Clone + 'static,
    {
        Tag::Inserting(Box::new(Insert {
            value,
            allows_children: true,
        }))
    }

    /// An inserting tag that never takes children, like a placeholder.
    pub fn self_closing_inserting(value: C) -> Self
    where
        C: Clone + 'static,
    {
        Tag::Inserting(Box::new(Insert {
            value,
            allows_children: false,
        }))
    }

    pub fn modifying(modifying: impl Modifying<C> + 'static) -> Self {
        Tag::Modifying(Box::new(modifying))
    }

    pub fn pre_process(text: impl Into<String>) -> Self {
        Tag::PreProcess(text.into())
    }

    pub fn allows_children(&self) -> bool {
        match self {
            Tag::Inserting(inserting) => inserting.allows_children(),
            Tag::Modifying(_) => true,
            Tag::PreProcess(_) | Tag::Reset => false,
        }
    }

    pub fn is_reset(&self) -> bool {
        matches!(self, Tag::Reset)
    }

    /// Short label used in debug output.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Tag::Inserting(_) => "inserting",
            Tag::Modifying(_) => "modifying",
            Tag::PreProcess(_) => "pre-process",
            Tag::Reset => "reset",
        }
    }
}

impl<C> fmt::Debug for Tag<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::PreProcess(text) => f.debug_tuple("PreProcess").field(text).finish(),
            Tag::Inserting(inserting) => f
                .debug_struct("Inserting")
                .field("allows_children", &inserting.allows_children())
                .finish_non_exhaustive(),
            Tag::Modifying(_) => f.debug_struct("Modifying").finish_non_exhaustive(),
            Tag::Reset => f.write_str("Reset"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Upper;

    impl Modifying<String> for Upper {
        fn apply(&self, current: String, _depth: usize) -> String {
            current.to_uppercase()
        }
    }

    #[test]
    fn test_inserting_value() {
        let tag = Tag::inserting("x".to_string());
        match &tag {
            Tag::Inserting(inserting) => assert_eq!(inserting.value(), "x"),
            other => panic!("Expected Inserting, got {other:?}"),
        }
        assert!(tag.allows_children());
    }

    #[test]
    fn test_self_closing_inserting() {
        let tag = Tag::self_closing_inserting(1);
        assert!(!tag.allows_children());
        assert_eq!(tag.kind_name(), "inserting");
    }

    #[test]
    fn test_modifying_allows_children() {
        let tag = Tag::modifying(Upper);
        assert!(tag.allows_children());
        match tag {
            Tag::Modifying(m) => assert_eq!(m.apply("ab".into(), 0), "AB"),
            other => panic!("Expected Modifying, got {other:?}"),
        }
    }

    #[test]
    fn test_directives() {
        let reset: Tag<String> = Tag::Reset;
        assert!(reset.is_reset());
        assert!(!reset.allows_children());

        let pre: Tag<String> = Tag::pre_process("<red>");
        assert!(!pre.is_reset());
        assert!(!pre.allows_children());
        assert_eq!(format!("{pre:?}"), "PreProcess(\"<red>\")");
    }
}
