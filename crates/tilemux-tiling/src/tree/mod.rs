//! Arena-backed binary layout tree.
//!
//! Nodes live in a flat `Vec` and are addressed by [`NodeId`]. A node is
//! never changed after it is pushed; operations push fresh copies of the
//! root-to-target path and leave the old slots behind. Those slots are
//! reclaimed by [`LayoutTree::compact`], which runs on its own once the
//! garbage outweighs the live nodes.

mod operations;
mod traversal;
mod types;

#[cfg(test)]
mod proptests;

pub use types::*;

/// Garbage below this many slots is never worth a compaction pass.
const COMPACT_FLOOR: usize = 32;

#[derive(Debug, Clone)]
pub struct LayoutTree<L> {
    nodes: Vec<Node<L>>,
    root: Option<NodeId>,
    leaves: usize,
    next_split: u64,
}

impl<L> Default for LayoutTree<L> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            leaves: 0,
            next_split: 1,
        }
    }
}

impl<L: Clone + PartialEq> LayoutTree<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_leaf(id: L) -> Self {
        let mut tree = Self::new();
        tree.set_single_leaf(id);
        tree
    }

    /// Build a tree from an owned shape. Splits get fresh ids and ratios
    /// are clamped.
    pub fn from_shape(shape: &NodeShape<L>) -> Self {
        let mut tree = Self::new();
        let root = tree.push_shape(shape);
        tree.root = Some(root);
        tree.leaves = shape.leaf_count();
        tree
    }

    /// Replace the whole tree with a single leaf.
    pub fn set_single_leaf(&mut self, id: L) {
        self.nodes.clear();
        self.nodes.push(Node::Leaf(id));
        self.root = Some(NodeId(0));
        self.leaves = 1;
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.leaves = 0;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<L>> {
        self.nodes.get(id.0)
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Slots currently held by the arena, reachable or not.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Owned recursive copy of the tree, or `None` when empty.
    pub fn to_shape(&self) -> Option<NodeShape<L>> {
        self.root.and_then(|root| self.shape_of(root))
    }

    fn shape_of(&self, at: NodeId) -> Option<NodeShape<L>> {
        match self.node(at)? {
            Node::Leaf(id) => Some(NodeShape::leaf(id.clone())),
            Node::Split(split) => Some(NodeShape::split(
                split.axis,
                split.ratio,
                self.shape_of(split.first)?,
                self.shape_of(split.second)?,
            )),
        }
    }

    fn push_shape(&mut self, shape: &NodeShape<L>) -> NodeId {
        match shape {
            NodeShape::Leaf { id } => self.push(Node::Leaf(id.clone())),
            NodeShape::Split {
                axis,
                ratio,
                first,
                second,
            } => {
                let first = self.push_shape(first);
                let second = self.push_shape(second);
                let id = self.alloc_split_id();
                self.push(Node::Split(Split {
                    id,
                    axis: *axis,
                    ratio: clamp_ratio(*ratio),
                    first,
                    second,
                }))
            }
        }
    }

    pub(crate) fn push(&mut self, node: Node<L>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub(crate) fn alloc_split_id(&mut self) -> SplitId {
        let id = SplitId(self.next_split);
        self.next_split += 1;
        id
    }

    /// Copy every split on `path` with its stepped child re-pointed, bottom
    /// up, and make the last copy the new root.
    pub(crate) fn rebuild_path(&mut self, path: &[(Split, Step)], child: NodeId) {
        let mut child = child;
        for &(split, step) in path.iter().rev() {
            child = self.push(Node::Split(split.with_child(step, child)));
        }
        self.root = Some(child);
        self.maybe_compact();
    }

    fn live_nodes(&self) -> usize {
        if self.leaves == 0 {
            0
        } else {
            2 * self.leaves - 1
        }
    }

    pub(crate) fn maybe_compact(&mut self) {
        let live = self.live_nodes();
        let garbage = self.nodes.len().saturating_sub(live);
        if garbage > live.max(COMPACT_FLOOR) {
            self.compact();
        }
    }

    /// Drop every unreachable slot. Invalidates outstanding [`NodeId`]s;
    /// [`SplitId`]s are kept.
    pub fn compact(&mut self) {
        let Some(root) = self.root else {
            self.nodes.clear();
            return;
        };
        let mut nodes = Vec::with_capacity(self.live_nodes());
        let new_root = self.copy_into(root, &mut nodes);
        self.nodes = nodes;
        self.root = Some(new_root);
    }

    fn copy_into(&self, at: NodeId, out: &mut Vec<Node<L>>) -> NodeId {
        let node = match &self.nodes[at.0] {
            Node::Leaf(id) => Node::Leaf(id.clone()),
            Node::Split(split) => {
                let first = self.copy_into(split.first, out);
                let second = self.copy_into(split.second, out);
                Node::Split(Split {
                    first,
                    second,
                    ..*split
                })
            }
        };
        out.push(node);
        NodeId(out.len() - 1)
    }
}
