//! Read-only walks over the tree: leaf order, lookup and paths.

use super::{LayoutTree, Node, NodeId, Split, SplitId, Step};

/// Ancestors of a node, root first, each with the step taken below it.
pub(crate) type Path = Vec<(Split, Step)>;

impl<L: Clone + PartialEq> LayoutTree<L> {
    /// Leaf ids depth-first, first child before second.
    pub fn leaf_order(&self) -> Vec<L> {
        let mut out = Vec::with_capacity(self.leaf_count());
        if let Some(root) = self.root() {
            self.collect_leaves(root, &mut out);
        }
        out
    }

    fn collect_leaves(&self, at: NodeId, out: &mut Vec<L>) {
        match self.node(at) {
            Some(Node::Leaf(id)) => out.push(id.clone()),
            Some(Node::Split(split)) => {
                self.collect_leaves(split.first, out);
                self.collect_leaves(split.second, out);
            }
            None => {}
        }
    }

    pub fn first_leaf(&self) -> Option<L> {
        self.edge_leaf(Step::First)
    }

    pub fn last_leaf(&self) -> Option<L> {
        self.edge_leaf(Step::Second)
    }

    fn edge_leaf(&self, step: Step) -> Option<L> {
        let mut at = self.root()?;
        loop {
            match self.node(at)? {
                Node::Leaf(id) => return Some(id.clone()),
                Node::Split(split) => at = split.child(step),
            }
        }
    }

    pub fn contains(&self, id: &L) -> bool {
        self.locate_leaf(id).is_some()
    }

    /// Steps from the root down to the leaf holding `id`.
    pub fn find_leaf_path(&self, id: &L) -> Option<Vec<Step>> {
        self.locate_leaf(id)
            .map(|(path, _)| path.into_iter().map(|(_, step)| step).collect())
    }

    /// Every split, pre-order.
    pub fn splits(&self) -> Vec<Split> {
        let mut out = Vec::with_capacity(self.leaf_count().saturating_sub(1));
        if let Some(root) = self.root() {
            self.collect_splits(root, &mut out);
        }
        out
    }

    fn collect_splits(&self, at: NodeId, out: &mut Vec<Split>) {
        if let Some(Node::Split(split)) = self.node(at) {
            out.push(*split);
            self.collect_splits(split.first, out);
            self.collect_splits(split.second, out);
        }
    }

    pub fn split(&self, id: SplitId) -> Option<Split> {
        self.locate_split(id).and_then(|(_, at)| match self.node(at) {
            Some(Node::Split(split)) => Some(*split),
            _ => None,
        })
    }

    pub(crate) fn locate_leaf(&self, id: &L) -> Option<(Path, NodeId)> {
        self.locate(&|node| matches!(node, Node::Leaf(leaf) if leaf == id))
    }

    pub(crate) fn locate_split(&self, id: SplitId) -> Option<(Path, NodeId)> {
        self.locate(&|node| matches!(node, Node::Split(split) if split.id == id))
    }

    fn locate(&self, hit: &dyn Fn(&Node<L>) -> bool) -> Option<(Path, NodeId)> {
        let root = self.root()?;
        let mut path = Vec::new();
        let found = self.search(root, &mut path, hit)?;
        Some((path, found))
    }

    fn search(
        &self,
        at: NodeId,
        path: &mut Path,
        hit: &dyn Fn(&Node<L>) -> bool,
    ) -> Option<NodeId> {
        let node = self.node(at)?;
        if hit(node) {
            return Some(at);
        }
        let Node::Split(split) = node else {
            return None;
        };
        for step in [Step::First, Step::Second] {
            path.push((*split, step));
            if let Some(found) = self.search(split.child(step), path, hit) {
                return Some(found);
            }
            path.pop();
        }
        None
    }
}
