//! Arena-backed parse tree.
//!
//! Nodes live in a flat vector owned by the [`Tree`]; parents and children
//! refer to each other through [`NodeId`]s. The root is always node 0.

use std::fmt;

use tagtext_lexer::Token;

use crate::part::TagPart;
use crate::tag::Tag;

/// Index of a node within its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

pub enum NodeKind<C> {
    Root,
    Tag(TagNode<C>),
    /// Literal text, escapes removed.
    Text(String),
}

/// A recognized tag with its resolved behavior.
pub struct TagNode<C> {
    parts: Vec<TagPart>,
    tag: Tag<C>,
}

impl<C> TagNode<C> {
    pub fn name(&self) -> &str {
        self.parts[0].value()
    }

    /// All parts, name first.
    pub fn parts(&self) -> &[TagPart] {
        &self.parts
    }

    pub fn arguments(&self) -> &[TagPart] {
        &self.parts[1..]
    }

    pub fn tag(&self) -> &Tag<C> {
        &self.tag
    }
}

struct NodeData<C> {
    parent: Option<NodeId>,
    token: Option<Token>,
    kind: NodeKind<C>,
    children: Vec<NodeId>,
}

/// A parsed message.
pub struct Tree<C> {
    message: String,
    original_message: String,
    nodes: Vec<NodeData<C>>,
}

impl<C> Tree<C> {
    pub(crate) fn new(message: &str, original_message: &str) -> Self {
        Self {
            message: message.to_string(),
            original_message: original_message.to_string(),
            nodes: vec![NodeData {
                parent: None,
                token: None,
                kind: NodeKind::Root,
                children: Vec::new(),
            }],
        }
    }

    fn push(&mut self, parent: NodeId, token: Token, kind: NodeKind<C>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent),
            token: Some(token),
            kind,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub(crate) fn push_text(&mut self, parent: NodeId, token: Token, text: String) -> NodeId {
        self.push(parent, token, NodeKind::Text(text))
    }

    /// # Panics
    ///
    /// Panics if `parts` is empty.
    pub(crate) fn push_tag(
        &mut self,
        parent: NodeId,
        token: Token,
        parts: Vec<TagPart>,
        tag: Tag<C>,
    ) -> NodeId {
        assert!(!parts.is_empty(), "tag node without a name");
        self.push(parent, token, NodeKind::Tag(TagNode { parts, tag }))
    }

    pub fn root_id(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn root(&self) -> NodeRef<'_, C> {
        self.get(NodeId::ROOT)
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn get(&self, id: NodeId) -> NodeRef<'_, C> {
        assert!(id.0 < self.nodes.len(), "node {id:?} out of range");
        NodeRef { tree: self, id }
    }

    /// The text that was parsed, after pre-processing.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The text the caller supplied.
    pub fn original_message(&self) -> &str {
        &self.original_message
    }

    /// Number of text and tag nodes. The root is not counted.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether the root has no children.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every node in document order, root first.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_, C>> {
        self.root().descendants()
    }
}

/// A borrowed view of one node.
pub struct NodeRef<'a, C> {
    tree: &'a Tree<C>,
    id: NodeId,
}

impl<C> Clone for NodeRef<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for NodeRef<'_, C> {}

impl<'a, C> NodeRef<'a, C> {
    fn data(&self) -> &'a NodeData<C> {
        &self.tree.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'a Tree<C> {
        self.tree
    }

    pub fn kind(&self) -> &'a NodeKind<C> {
        &self.data().kind
    }

    pub fn parent(&self) -> Option<NodeRef<'a, C>> {
        self.data().parent.map(|id| self.tree.get(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, C>> + 'a {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| tree.get(id))
    }

    /// This node and everything below it, depth-first in document order.
    pub fn descendants(&self) -> impl Iterator<Item = NodeRef<'a, C>> + 'a {
        let tree = self.tree;
        let mut stack = vec![self.id];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(tree.nodes[id.0].children.iter().rev().copied());
            Some(tree.get(id))
        })
    }

    /// The token this node was built from. `None` for the root.
    pub fn token(&self) -> Option<&'a Token> {
        self.data().token.as_ref()
    }

    pub fn as_tag(&self) -> Option<&'a TagNode<C>> {
        match self.kind() {
            NodeKind::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match self.kind() {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self.kind(), NodeKind::Root)
    }

    /// Dump this subtree. Walks an explicit stack, so nesting depth is
    /// bounded by memory rather than the call stack.
    fn write(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Step {
            Open(NodeId, usize),
            Close(usize),
        }

        let mut stack = vec![Step::Open(self.id, 0)];
        while let Some(step) = stack.pop() {
            let (id, indent) = match step {
                Step::Close(indent) => {
                    pad(f, indent)?;
                    f.write_str("}\n")?;
                    continue;
                }
                Step::Open(id, indent) => (id, indent),
            };

            pad(f, indent)?;
            let node = &self.tree.nodes[id.0];
            match &node.kind {
                NodeKind::Text(text) => {
                    writeln!(f, "TextNode('{text}')")?;
                    continue;
                }
                NodeKind::Root => f.write_str("Node {\n")?,
                NodeKind::Tag(tag) => {
                    f.write_str("TagNode(")?;
                    for (i, part) in tag.parts.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "'{}'", part.value())?;
                    }
                    f.write_str(") {\n")?;
                }
            }
            stack.push(Step::Close(indent));
            stack.extend(
                node.children
                    .iter()
                    .rev()
                    .map(|&child| Step::Open(child, indent + 1)),
            );
        }
        Ok(())
    }
}

/// Two spaces per level.
fn pad(f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
    const SPACES: &str = "                                                                ";
    let mut remaining = indent * 2;
    while remaining > 0 {
        let n = remaining.min(SPACES.len());
        f.write_str(&SPACES[..n])?;
        remaining -= n;
    }
    Ok(())
}

impl<C> fmt::Display for NodeRef<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(f)
    }
}

impl<C> fmt::Display for Tree<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root().write(f)
    }
}

impl<C> fmt::Debug for Tree<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("message", &self.message)
            .field("nodes", &self.nodes.len())
            .finish()
    }
}
