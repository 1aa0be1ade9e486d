//! # Document Tree
//!
//! The parsed form of a document body that the renderer walks.
//!
//! Nodes live in an arena owned by [`DocumentTree`] and are linked by
//! `first_child` / `next_sibling`, so a node owns its children while siblings
//! only point at each other. The renderer borrows the tree; it never mutates it.
//!
//! ## Modules
//!
//! - **`span`**: byte ranges into the document body
//! - **`builder`**: [`TreeBuilder`], the append-only way to construct a tree

pub mod builder;
pub mod span;

pub use builder::TreeBuilder;
pub use span::{Span, SpanOutOfBounds};

/// Index of a node inside its [`DocumentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a node represents, with its kind-specific data.
///
/// The set is closed: everything a renderer has to handle is listed here.
/// Parser adapters record any construct outside the set as
/// [`NodeKind::Unrecognized`] so that it can never be dropped silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Text {
        content: String,
    },
    ThematicBreak,
    Heading {
        /// 1 through 6; renderers clamp anything outside that range
        level: u8,
    },
    Paragraph,
    Blockquote,
    FencedCodeBlock {
        language: Option<String>,
        lines: Vec<Span>,
    },
    List,
    ListItem,
    Link {
        destination: String,
        title: Option<String>,
    },
    /// Inline content of a tight list item, with no paragraph around it.
    TextBlock,
    HtmlBlock {
        lines: Vec<Span>,
    },
    RawHtml {
        segments: Vec<Span>,
    },
    AutoLink {
        label: String,
        text: String,
    },
    Emphasis,
    CodeSpan {
        segments: Vec<Span>,
    },
    Table,
    TableHeader,
    TableRow,
    TableCell,
    /// A construct the parser produced that is outside the closed set.
    Unrecognized {
        kind: String,
    },
}

impl NodeKind {
    /// Short name used in logs and error messages.
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Text { .. } => "Text",
            NodeKind::ThematicBreak => "ThematicBreak",
            NodeKind::Heading { .. } => "Heading",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::Blockquote => "Blockquote",
            NodeKind::FencedCodeBlock { .. } => "FencedCodeBlock",
            NodeKind::List => "List",
            NodeKind::ListItem => "ListItem",
            NodeKind::Link { .. } => "Link",
            NodeKind::TextBlock => "TextBlock",
            NodeKind::HtmlBlock { .. } => "HTMLBlock",
            NodeKind::RawHtml { .. } => "RawHTML",
            NodeKind::AutoLink { .. } => "AutoLink",
            NodeKind::Emphasis => "Emphasis",
            NodeKind::CodeSpan { .. } => "CodeSpan",
            NodeKind::Table => "Table",
            NodeKind::TableHeader => "TableHeader",
            NodeKind::TableRow => "TableRow",
            NodeKind::TableCell => "TableCell",
            NodeKind::Unrecognized { kind } => kind,
        }
    }
}

/// A single node and its links to the rest of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub(crate) first_child: Option<NodeId>,
    pub(crate) next_sibling: Option<NodeId>,
}

impl Node {
    pub fn first_child(&self) -> Option<NodeId> {
        self.first_child
    }

    pub fn next_sibling(&self) -> Option<NodeId> {
        self.next_sibling
    }
}

/// A parsed document body.
///
/// Created by a parser per input document and discarded after rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTree {
    nodes: Vec<Node>,
    top_level: Option<NodeId>,
}

impl DocumentTree {
    /// The first top-level node; the rest follow through `next_sibling`.
    pub fn top_level(&self) -> Option<NodeId> {
        self.top_level
    }

    /// Looks up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced for this tree.
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.get(id).kind
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).next_sibling
    }

    /// Iterates the sibling chain starting at `first`.
    pub fn siblings(&self, first: Option<NodeId>) -> Siblings<'_> {
        Siblings {
            tree: self,
            next: first,
        }
    }

    /// Iterates the children of `id` in order.
    pub fn children(&self, id: NodeId) -> Siblings<'_> {
        self.siblings(self.first_child(id))
    }

    /// Total number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator over a `next_sibling` chain.
pub struct Siblings<'t> {
    tree: &'t DocumentTree,
    next: Option<NodeId>,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}
