use jadeite_errors::Diagnostic;
use jadeite_tokenizer::{Token, TokenKind};
use jadeite_tree::{ListNode, Node, TagNode, Tree};

/// Element opened by a line that starts with `.class`, `#id` or `(attrs)`.
const IMPLICIT_TAG: &str = "div";
const DEFAULT_DOCTYPE: &str = "default";

pub(crate) fn build<'a>(
    name: &str,
    tokens: impl IntoIterator<Item = Token<'a>>,
) -> Result<Tree, Diagnostic> {
    log::debug!("{name}: building tree");
    let mut builder = Builder::new(name);

    for token in tokens {
        log::trace!("{name}: {}: {token}", token.kind);

        match token.kind {
            TokenKind::EndOfInput => break,
            TokenKind::Error => return Err(Diagnostic::error(name, token.text, token.range)),
            _ => builder.token(&token),
        }
    }

    let tree = builder.finish();
    log::debug!("{name}: built {} top-level nodes", tree.root.nodes.len());
    Ok(tree)
}

struct OpenTag {
    depth: usize,
    tag: TagNode,
}

struct Builder<'a> {
    name: &'a str,
    root: ListNode,
    open: Vec<OpenTag>,
    depth: usize,
    /// The innermost open tag was started on the current line.
    line_tag: bool,
    spaces: bool,
    tabs: bool,
    warned_mixed: bool,
}

impl<'a> Builder<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            root: ListNode::new(),
            open: Vec::new(),
            depth: 0,
            line_tag: false,
            spaces: false,
            tabs: false,
            warned_mixed: false,
        }
    }

    fn token(&mut self, token: &Token<'_>) {
        match token.kind {
            TokenKind::NewLine => {
                self.depth = 0;
                self.line_tag = false;
            }
            TokenKind::IndentSpace | TokenKind::IndentTab => self.indent(token.kind),
            TokenKind::Tag => self.open_tag(token.text),
            TokenKind::Id => self.decorate(Node::Id(token.text.to_owned())),
            TokenKind::Class => self.decorate(Node::Class(token.text.to_owned())),
            TokenKind::Attr => self.decorate(Node::Attr(token.text.to_owned())),
            TokenKind::Text => {
                if !self.line_tag {
                    self.close(self.depth);
                }
                self.attach(Node::Text(token.text.to_owned()));
            }
            TokenKind::Doctype => {
                let doctype = if token.text.is_empty() { DEFAULT_DOCTYPE } else { token.text };
                self.close(self.depth);
                self.attach(Node::Doctype(doctype.to_owned()));
            }
            TokenKind::Comment
            | TokenKind::Blank
            | TokenKind::EndOfInput
            | TokenKind::Error => {}
        }
    }

    fn indent(&mut self, kind: TokenKind) {
        self.depth += 1;

        match kind {
            TokenKind::IndentTab => self.tabs = true,
            _ => self.spaces = true,
        }

        if self.spaces && self.tabs && !self.warned_mixed {
            log::warn!(
                "{}: indentation mixes tabs and spaces, each counts as one level",
                self.name
            );
            self.warned_mixed = true;
        }
    }

    fn open_tag(&mut self, name: &str) {
        self.close(self.depth);
        self.open.push(OpenTag { depth: self.depth, tag: TagNode::new(name) });
        self.line_tag = true;
    }

    fn decorate(&mut self, node: Node) {
        if !self.line_tag {
            self.open_tag(IMPLICIT_TAG);
        }
        self.attach(node);
    }

    fn attach(&mut self, node: Node) {
        match self.open.last_mut() {
            Some(parent) => parent.tag.push(node),
            None => self.root.push(node),
        }
    }

    /// Closes every open tag at `depth` or deeper.
    fn close(&mut self, depth: usize) {
        while self.open.last().is_some_and(|top| top.depth >= depth) {
            if let Some(OpenTag { tag, .. }) = self.open.pop() {
                self.attach(Node::Tag(tag));
            }
        }
    }

    fn finish(mut self) -> Tree {
        self.close(0);
        Tree::new(self.name, self.root)
    }
}
