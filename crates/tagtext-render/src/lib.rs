//! tagtext Renderer
//!
//! Turns a parsed [`Tree`] into the host's output component type. Text nodes
//! become text components, inserting tags supply their value, and modifying
//! tags rewrite everything nested inside them.
//!
//! ```text
//! Tree<C> → render() → C
//! ```

pub mod placeholder;

use tagtext_parser::{Modifying, NodeId, NodeKind, NodeRef, Tag, Tree};

/// The output type a tree renders into.
pub trait Component: Sized {
    fn empty() -> Self;

    fn text(text: &str) -> Self;

    /// Append children after any existing ones.
    fn append_children(self, children: Vec<Self>) -> Self;

    /// Split off the children, returning the childless component and them.
    fn take_children(self) -> (Self, Vec<Self>);
}

/// Plain text. Children are concatenated in place, so there is no structure
/// left to split.
impl Component for String {
    fn empty() -> Self {
        String::new()
    }

    fn text(text: &str) -> Self {
        text.to_string()
    }

    fn append_children(mut self, children: Vec<Self>) -> Self {
        for child in children {
            self.push_str(&child);
        }
        self
    }

    fn take_children(self) -> (Self, Vec<Self>) {
        (self, Vec::new())
    }
}

/// Render a tree into a single component.
///
/// The walk keeps its own stack, so deeply nested markup does not grow the
/// call stack.
pub fn render<C: Component>(tree: &Tree<C>) -> C {
    log::trace!("rendering {} nodes", tree.len());

    enum Frame {
        Enter(NodeId),
        Exit(NodeId),
    }

    // Rendered subtrees waiting for their parent's `Exit`.
    let mut done: Vec<C> = Vec::new();
    let mut stack = vec![Frame::Enter(tree.root_id())];
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(id) => {
                let node = tree.get(id);
                if let Some(modifier) = modifier_of(node) {
                    visit(modifier, node);
                    modifier.post_visit();
                }
                stack.push(Frame::Exit(id));
                let children: Vec<NodeId> = node.children().map(|child| child.id()).collect();
                stack.extend(children.into_iter().rev().map(Frame::Enter));
            }
            Frame::Exit(id) => {
                let node = tree.get(id);
                let component = match node.kind() {
                    NodeKind::Root => C::empty(),
                    NodeKind::Text(text) => C::text(text),
                    NodeKind::Tag(tag_node) => match tag_node.tag() {
                        Tag::Inserting(inserting) => inserting.value(),
                        Tag::Modifying(_) | Tag::Reset => C::empty(),
                        Tag::PreProcess(text) => C::text(text),
                    },
                };

                let count = node.children().count();
                let children = done.split_off(done.len() - count);
                let component = if children.is_empty() {
                    component
                } else {
                    component.append_children(children)
                };

                done.push(match modifier_of(node) {
                    Some(modifier) => apply(modifier, component),
                    None => component,
                });
            }
        }
    }

    done.pop().unwrap_or_else(C::empty)
}

fn modifier_of<'a, C>(node: NodeRef<'a, C>) -> Option<&'a dyn Modifying<C>> {
    match node.as_tag()?.tag() {
        Tag::Modifying(modifier) => Some(modifier.as_ref()),
        _ => None,
    }
}

/// Show `node` and everything below it to the modifier, parents first.
fn visit<C>(modifier: &dyn Modifying<C>, node: NodeRef<'_, C>) {
    let mut stack = vec![(node, 0)];
    while let Some((node, depth)) = stack.pop() {
        modifier.visit(node, depth);
        let children: Vec<_> = node.children().collect();
        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
    }
}

/// Apply the modifier to `component` and, one level deeper each time, to
/// every child beneath it. Parents are applied before their children.
fn apply<C: Component>(modifier: &dyn Modifying<C>, component: C) -> C {
    enum Step<C> {
        Apply(C, usize),
        Join(C, usize),
    }

    let mut done: Vec<C> = Vec::new();
    let mut stack = vec![Step::Apply(component, 0)];
    while let Some(step) = stack.pop() {
        match step {
            Step::Apply(component, depth) => {
                let (component, children) = component.take_children();
                let applied = modifier.apply(component, depth);
                if children.is_empty() {
                    done.push(applied);
                    continue;
                }
                stack.push(Step::Join(applied, children.len()));
                stack.extend(
                    children
                        .into_iter()
                        .rev()
                        .map(|child| Step::Apply(child, depth + 1)),
                );
            }
            Step::Join(applied, count) => {
                let children = done.split_off(done.len() - count);
                done.push(applied.append_children(children));
            }
        }
    }

    done.pop().unwrap_or_else(C::empty)
}
