//! Arena-allocated syntax tree.
//!
//! Nodes live in a single `Vec` and refer to their children by [`NodeId`].
//! A node owns its child list exclusively; parents are never stored. Passes
//! that need to rewrite a node in place walk the tree with
//! [`Ast::walk`], which reports each node together with its parent and
//! position, and then call [`Ast::replace_at`].
//!
//! Nodes detached by a rewrite stay in the arena but are unreachable from
//! the root, so they are never rendered.

use pulldown_cmark::Alignment;

use crate::error::ValidationError;
use crate::extension::AlertKind;

/// Index of a node in an [`Ast`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Validated repository reference carried by a repository card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoRef {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

/// Closed set of node kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Tree root.
    Document,
    Paragraph,
    /// Heading with level 1-6.
    Heading { level: u8 },
    Blockquote,
    /// Callout produced from a blockquote by the alert transform.
    Alert(AlertKind),
    /// Repository card, or the validation error to render in its place.
    RepoCard(Result<RepoRef, ValidationError>),
    /// Fenced or indented code. `info` is the fence info string.
    CodeBlock {
        info: Option<String>,
        literal: String,
    },
    /// Raw HTML block.
    Html(String),
    /// List; `start` is set for ordered lists.
    List { start: Option<u64> },
    Item,
    TaskListMarker(bool),
    Table { alignments: Vec<Alignment> },
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Superscript,
    Subscript,
    Link { url: String, title: String },
    /// Image; children hold the alt text.
    Image { url: String, title: String },
    /// Centered caption span with a single text child.
    Caption,
    Text(String),
    Code(String),
    InlineHtml(String),
    SoftBreak,
    HardBreak,
    Rule,
    FootnoteReference(String),
    FootnoteDefinition(String),
    /// Transparent container for constructs the parser is not asked to
    /// produce; renders its children only.
    Fragment,
}

#[derive(Clone, Debug)]
struct Node {
    kind: NodeKind,
    children: Vec<NodeId>,
}

/// Syntax tree arena rooted at a [`NodeKind::Document`] node.
#[derive(Clone, Debug)]
pub struct Ast {
    nodes: Vec<Node>,
}

/// Position of a node inside its parent's child list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    /// The parent node.
    pub parent: NodeId,
    /// Index within the parent's children.
    pub index: usize,
    /// The node at that position.
    pub node: NodeId,
}

impl Ast {
    /// Create a tree holding only the document root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Document,
                children: Vec::new(),
            }],
        }
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            children: Vec::new(),
        });
        id
    }

    /// Allocate a node and append it to `parent`.
    pub fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.alloc(kind);
        self.nodes[parent.0].children.push(id);
        id
    }

    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Detach and return all children of `id`, preserving order.
    pub fn take_children(&mut self, id: NodeId) -> Vec<NodeId> {
        std::mem::take(&mut self.nodes[id.0].children)
    }

    /// Replace the child list of `id`.
    pub fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        self.nodes[id.0].children = children;
    }

    /// Put `node` at `index` in `parent`'s child list and return the node it
    /// displaced. Siblings keep their positions.
    pub fn replace_at(&mut self, parent: NodeId, index: usize, node: NodeId) -> NodeId {
        std::mem::replace(&mut self.nodes[parent.0].children[index], node)
    }

    /// Every node reachable from the root except the root itself, in
    /// pre-order, with its parent and position.
    #[must_use]
    pub fn walk(&self) -> Vec<Slot> {
        let mut ordered = Vec::new();
        let mut stack = Vec::new();
        self.push_children(self.root(), &mut stack);
        while let Some(slot) = stack.pop() {
            ordered.push(slot);
            self.push_children(slot.node, &mut stack);
        }
        ordered
    }

    // Pushed in reverse so the first child is popped first.
    fn push_children(&self, parent: NodeId, stack: &mut Vec<Slot>) {
        for (index, &node) in self.children(parent).iter().enumerate().rev() {
            stack.push(Slot {
                parent,
                index,
                node,
            });
        }
    }

    /// Number of leading children of `id` that are [`NodeKind::Text`].
    #[must_use]
    pub fn leading_text_len(&self, id: NodeId) -> usize {
        self.children(id)
            .iter()
            .take_while(|&&child| matches!(self.kind(child), NodeKind::Text(_)))
            .count()
    }

    /// Concatenation of the contiguous text leaves at the start of `id`.
    ///
    /// The tokenizer may split one run of characters into several text
    /// leaves (for example around `[` and `!`), so pattern matching on
    /// "the text of a paragraph" must use this instead of a single leaf.
    #[must_use]
    pub fn leading_text(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .map_while(|&child| match self.kind(child) {
                NodeKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Plain text of the subtree under `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text(text) | NodeKind::Code(text) => out.push_str(text),
            NodeKind::SoftBreak | NodeKind::HardBreak => out.push(' '),
            _ => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }
}

impl Default for Ast {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> NodeKind {
        NodeKind::Text(s.to_owned())
    }

    #[test]
    fn test_new_tree_has_document_root() {
        let ast = Ast::new();
        assert_eq!(ast.kind(ast.root()), &NodeKind::Document);
        assert!(ast.children(ast.root()).is_empty());
    }

    #[test]
    fn test_replace_at_keeps_sibling_order() {
        let mut ast = Ast::new();
        let root = ast.root();
        let a = ast.append(root, NodeKind::Paragraph);
        let b = ast.append(root, NodeKind::Blockquote);
        let c = ast.append(root, NodeKind::Rule);

        let alert = ast.alloc(NodeKind::Alert(AlertKind::Note));
        let displaced = ast.replace_at(root, 1, alert);

        assert_eq!(displaced, b);
        assert_eq!(ast.children(root), &[a, alert, c]);
    }

    #[test]
    fn test_walk_is_preorder_with_positions() {
        let mut ast = Ast::new();
        let root = ast.root();
        let quote = ast.append(root, NodeKind::Blockquote);
        let para = ast.append(quote, NodeKind::Paragraph);
        let leaf = ast.append(para, text("x"));
        let rule = ast.append(root, NodeKind::Rule);

        let nodes: Vec<NodeId> = ast.walk().iter().map(|s| s.node).collect();
        assert_eq!(nodes, vec![quote, para, leaf, rule]);

        let slots = ast.walk();
        assert_eq!(
            slots[3],
            Slot {
                parent: root,
                index: 1,
                node: rule
            }
        );
    }

    #[test]
    fn test_leading_text_concatenates_fragments() {
        let mut ast = Ast::new();
        let para = ast.append(ast.root(), NodeKind::Paragraph);
        ast.append(para, text("["));
        ast.append(para, text("!NOTE"));
        ast.append(para, text("]"));
        ast.append(para, NodeKind::SoftBreak);
        ast.append(para, text("body"));

        assert_eq!(ast.leading_text(para), "[!NOTE]");
        assert_eq!(ast.leading_text_len(para), 3);
    }

    #[test]
    fn test_text_content_flattens_inline_markup() {
        let mut ast = Ast::new();
        let heading = ast.append(ast.root(), NodeKind::Heading { level: 1 });
        ast.append(heading, text("Hello "));
        let strong = ast.append(heading, NodeKind::Strong);
        ast.append(strong, text("World"));

        assert_eq!(ast.text_content(heading), "Hello World");
    }
}
