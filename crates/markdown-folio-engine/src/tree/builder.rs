use super::{DocumentTree, Node, NodeId, NodeKind};

/// Builds a [`DocumentTree`] from a stream of open/leaf/close calls.
///
/// Every new node is appended as the last child of the innermost open node
/// (or as the last top-level node), so sibling order follows call order.
pub struct TreeBuilder {
    nodes: Vec<Node>,
    /// Last child of each node, parallel to `nodes`.
    last_child: Vec<Option<NodeId>>,
    open: Vec<NodeId>,
    top_first: Option<NodeId>,
    top_last: Option<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![],
            last_child: vec![],
            open: vec![],
            top_first: None,
            top_last: None,
        }
    }

    /// Appends a node and makes it the parent of subsequent nodes until
    /// the matching [`close`](Self::close).
    pub fn open(&mut self, kind: NodeKind) -> NodeId {
        let id = self.append(kind);
        self.open.push(id);
        id
    }

    /// Appends a node that receives no children.
    pub fn leaf(&mut self, kind: NodeKind) -> NodeId {
        self.append(kind)
    }

    /// Closes the innermost open node, returning it.
    ///
    /// Returns `None` when nothing is open.
    pub fn close(&mut self) -> Option<NodeId> {
        self.open.pop()
    }

    /// The innermost open node.
    pub fn current(&self) -> Option<NodeId> {
        self.open.last().copied()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Number of currently open nodes.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Finishes the tree. Nodes still open are treated as closed.
    pub fn finish(self) -> DocumentTree {
        DocumentTree {
            nodes: self.nodes,
            top_level: self.top_first,
        }
    }

    fn append(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            first_child: None,
            next_sibling: None,
        });
        self.last_child.push(None);

        match self.open.last().copied() {
            Some(parent) => {
                match self.last_child[parent.0] {
                    Some(prev) => self.nodes[prev.0].next_sibling = Some(id),
                    None => self.nodes[parent.0].first_child = Some(id),
                }
                self.last_child[parent.0] = Some(id);
            }
            None => {
                match self.top_last {
                    Some(prev) => self.nodes[prev.0].next_sibling = Some(id),
                    None => self.top_first = Some(id),
                }
                self.top_last = Some(id);
            }
        }

        id
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> NodeKind {
        NodeKind::Text { content: s.into() }
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut b = TreeBuilder::new();
        let p = b.open(NodeKind::Paragraph);
        b.leaf(text("a"));
        b.leaf(text("b"));
        b.leaf(text("c"));
        b.close();
        let tree = b.finish();

        let kinds: Vec<_> = tree.children(p).map(|id| tree.kind(id).clone()).collect();
        assert_eq!(kinds, vec![text("a"), text("b"), text("c")]);
    }

    #[test]
    fn top_level_chain_links_siblings() {
        let mut b = TreeBuilder::new();
        let h = b.open(NodeKind::Heading { level: 1 });
        b.leaf(text("Title"));
        b.close();
        let p = b.open(NodeKind::Paragraph);
        b.close();
        b.leaf(NodeKind::ThematicBreak);
        let tree = b.finish();

        assert_eq!(tree.top_level(), Some(h));
        assert_eq!(tree.next_sibling(h), Some(p));
        assert_eq!(tree.siblings(tree.top_level()).count(), 3);
        assert!(tree.first_child(p).is_none());
    }

    #[test]
    fn nested_children_do_not_leak_into_parent_chain() {
        let mut b = TreeBuilder::new();
        let list = b.open(NodeKind::List);
        let first = b.open(NodeKind::ListItem);
        b.leaf(text("one"));
        b.close();
        let second = b.open(NodeKind::ListItem);
        b.close();
        b.close();
        let tree = b.finish();

        let items: Vec<_> = tree.children(list).collect();
        assert_eq!(items, vec![first, second]);
        assert_eq!(tree.children(first).count(), 1);
        assert!(tree.next_sibling(list).is_none());
    }

    #[test]
    fn close_with_nothing_open_is_none() {
        let mut b = TreeBuilder::new();
        assert!(b.close().is_none());
        b.open(NodeKind::Blockquote);
        assert_eq!(b.depth(), 1);
        assert!(b.close().is_some());
        assert_eq!(b.depth(), 0);
    }
}
