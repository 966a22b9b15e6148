use std::fmt;

use crate::doctype;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NodeKind {
    Text,
    Tag,
    Attr,
    Doctype,
    Id,
    Class,
    List,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeKind::Text => "text",
            NodeKind::Tag => "tag",
            NodeKind::Attr => "attr",
            NodeKind::Doctype => "doctype",
            NodeKind::Id => "id",
            NodeKind::Class => "class",
            NodeKind::List => "List",
        })
    }
}

/// An element of the document tree.
///
/// `Clone` is a deep copy: a cloned node shares nothing with its source, so
/// a parsed tree can be embedded into another document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Node {
    List(ListNode),
    Tag(TagNode),
    Text(String),
    Doctype(String),
    Attr(String),
    Id(String),
    Class(String),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::List(_) => NodeKind::List,
            Node::Tag(_) => NodeKind::Tag,
            Node::Text(_) => NodeKind::Text,
            Node::Doctype(_) => NodeKind::Doctype,
            Node::Attr(_) => NodeKind::Attr,
            Node::Id(_) => NodeKind::Id,
            Node::Class(_) => NodeKind::Class,
        }
    }

    /// Children of container nodes, empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::List(list) => &list.nodes,
            Node::Tag(tag) => &tag.nodes,
            _ => &[],
        }
    }

    /// Plain form used by diagnostics: a tag's name, a leaf's payload.
    pub fn text(&self) -> String {
        match self {
            Node::List(list) => list.text(),
            Node::Tag(tag) => tag.name.clone(),
            Node::Text(payload)
            | Node::Doctype(payload)
            | Node::Attr(payload)
            | Node::Id(payload)
            | Node::Class(payload) => payload.clone(),
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    pub fn render_into(&self, out: &mut String) {
        match self {
            Node::List(list) => list.render_into(out),
            Node::Tag(tag) => tag.render_into(out),
            Node::Doctype(name) => doctype::render_into(name, out),
            Node::Text(payload) | Node::Attr(payload) | Node::Id(payload) | Node::Class(payload) => {
                out.push_str(payload)
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// A sequence of sibling nodes in lexical order.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListNode {
    pub nodes: Vec<Node>,
}

impl ListNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn text(&self) -> String {
        self.nodes.iter().map(Node::text).collect()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    pub fn render_into(&self, out: &mut String) {
        for node in &self.nodes {
            node.render_into(out);
        }
    }
}

/// An element. Attr, Id and Class children decorate the opening tag; Text
/// and Tag children form its body.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TagNode {
    pub name: String,
    pub nodes: Vec<Node>,
}

impl TagNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), nodes: Vec::new() }
    }

    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out);
        out
    }

    pub fn render_into(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);

        for node in &self.nodes {
            if let Node::Attr(attr) = node {
                out.push(' ');
                out.push_str(attr);
            }
        }

        for node in &self.nodes {
            if let Node::Id(id) = node {
                out.push_str(" id=\"");
                out.push_str(id);
                out.push('"');
            }
        }

        let mut classes = self.nodes.iter().filter_map(|node| match node {
            Node::Class(class) => Some(class.as_str()),
            _ => None,
        });
        if let Some(first) = classes.next() {
            out.push_str(" class=\"");
            out.push_str(first);
            for class in classes {
                out.push(' ');
                out.push_str(class);
            }
            out.push('"');
        }

        out.push('>');

        for node in &self.nodes {
            if matches!(node, Node::Text(_) | Node::Tag(_)) {
                node.render_into(out);
            }
        }

        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}
