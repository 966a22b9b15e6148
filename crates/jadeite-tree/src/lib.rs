//! Document tree produced by the template parser, and its HTML rendering.

mod doctype;
mod node;

use std::fmt;

pub use doctype::{DOCTYPES, lookup as lookup_doctype};
pub use node::{ListNode, Node, NodeKind, TagNode};

/// A named document. The root always wraps the top-level siblings.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tree {
    pub name: String,
    pub root: ListNode,
}

impl Tree {
    pub fn new(name: impl Into<String>, root: ListNode) -> Self {
        Self { name: name.into(), root }
    }

    pub fn render(&self) -> String {
        self.root.render()
    }

    /// One line per node, children indented by two spaces.
    pub fn debug_tree(&self) -> String {
        DebugTree(&self.root).to_string()
    }
}

struct DebugTree<'a>(&'a ListNode);

impl fmt::Display for DebugTree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "List")?;
        self.0.nodes.iter().try_for_each(|node| debug_node(f, node, 2))
    }
}

fn debug_node(f: &mut fmt::Formatter<'_>, node: &Node, indent: usize) -> fmt::Result {
    match node {
        Node::List(_) => writeln!(f, "{:indent$}List", "")?,
        _ => writeln!(f, "{:indent$}{}:{}", "", node.kind(), node.text())?,
    }

    node.children().iter().try_for_each(|child| debug_node(f, child, indent + 2))
}
