//! Structural operations: insert, remove, swap, relabel, ratio updates.
//!
//! Every operation is total. A missing target leaves the tree untouched
//! and is reported through the return value.

use super::{clamp_ratio, LayoutTree, Node, NodeId, Side, Split, SplitId, Step};

impl<L: Clone + PartialEq> LayoutTree<L> {
    /// Wrap the `target` leaf in a new even split holding `new` on `side`.
    ///
    /// Returns `false` when `target` is absent or `new` is already a leaf.
    pub fn insert_leaf(&mut self, target: &L, new: L, side: Side) -> bool {
        if self.contains(&new) {
            return false;
        }
        let Some((path, leaf)) = self.locate_leaf(target) else {
            return false;
        };
        let new_leaf = self.push(Node::Leaf(new));
        let (first, second) = if side.new_is_first() {
            (new_leaf, leaf)
        } else {
            (leaf, new_leaf)
        };
        let id = self.alloc_split_id();
        let split = self.push(Node::Split(Split {
            id,
            axis: side.axis(),
            ratio: 0.5,
            first,
            second,
        }));
        self.leaves += 1;
        self.rebuild_path(&path, split);
        true
    }

    /// Delete a leaf; its parent split is replaced by the surviving sibling.
    pub fn remove_leaf(&mut self, id: &L) -> bool {
        let Some((mut path, _)) = self.locate_leaf(id) else {
            return false;
        };
        match path.pop() {
            None => self.clear(),
            Some((parent, step)) => {
                self.leaves -= 1;
                let sibling = parent.child(step.other());
                self.rebuild_path(&path, sibling);
            }
        }
        true
    }

    /// Set a split's ratio, clamped to `[0.1, 0.9]`. Returns `true` if the
    /// split exists and its ratio actually changed.
    pub fn update_split_ratio(&mut self, split_id: SplitId, ratio: f64) -> bool {
        let Some((path, at)) = self.locate_split(split_id) else {
            return false;
        };
        let Some(Node::Split(split)) = self.node(at) else {
            return false;
        };
        let ratio = clamp_ratio(ratio);
        if split.ratio == ratio {
            return false;
        }
        let updated = Split { ratio, ..*split };
        let node = self.push(Node::Split(updated));
        self.rebuild_path(&path, node);
        true
    }

    /// Exchange two leaves' ids without changing the shape. No-op unless
    /// both are present and distinct.
    pub fn swap_leaves(&mut self, a: &L, b: &L) -> bool {
        if a == b {
            return false;
        }
        let (Some(path_a), Some(path_b)) = (self.find_leaf_path(a), self.find_leaf_path(b)) else {
            return false;
        };
        self.replace_at(&path_a, Node::Leaf(b.clone()));
        self.replace_at(&path_b, Node::Leaf(a.clone()));
        true
    }

    /// Assign `order[i]` to the i-th leaf left to right. The length must
    /// match `leaf_count()`. Returns `true` if any leaf changed.
    pub fn relabel_leaves(&mut self, order: &[L]) -> bool {
        if order.len() != self.leaf_count() || self.leaf_order() == order {
            return false;
        }
        let Some(root) = self.root() else {
            return false;
        };
        let mut labels = order.iter();
        let new_root = self.relabel_from(root, &mut labels);
        self.root = Some(new_root);
        self.maybe_compact();
        true
    }

    fn relabel_from(&mut self, at: NodeId, labels: &mut std::slice::Iter<'_, L>) -> NodeId {
        let split = match self.node(at) {
            Some(Node::Split(split)) => *split,
            Some(Node::Leaf(_)) => {
                return match labels.next() {
                    Some(label) => self.push(Node::Leaf(label.clone())),
                    None => at,
                };
            }
            None => return at,
        };
        let first = self.relabel_from(split.first, labels);
        let second = self.relabel_from(split.second, labels);
        self.push(Node::Split(Split {
            first,
            second,
            ..split
        }))
    }

    /// Give every split a ratio proportional to the leaves on each side, so
    /// all panes along an axis get the same share.
    pub fn equalize(&mut self) -> bool {
        let Some(root) = self.root() else {
            return false;
        };
        let mut changed = false;
        let (new_root, _) = self.equalize_from(root, &mut changed);
        if changed {
            self.root = Some(new_root);
            self.maybe_compact();
        }
        changed
    }

    fn equalize_from(&mut self, at: NodeId, changed: &mut bool) -> (NodeId, usize) {
        let split = match self.node(at) {
            Some(Node::Split(split)) => *split,
            _ => return (at, 1),
        };
        let (first, left) = self.equalize_from(split.first, changed);
        let (second, right) = self.equalize_from(split.second, changed);
        let ratio = clamp_ratio(left as f64 / (left + right) as f64);
        if ratio == split.ratio && first == split.first && second == split.second {
            return (at, left + right);
        }
        *changed = true;
        let node = self.push(Node::Split(Split {
            ratio,
            first,
            second,
            ..split
        }));
        (node, left + right)
    }

    /// Swap in `node` at the end of `steps`, copying the path above it.
    fn replace_at(&mut self, steps: &[Step], node: Node<L>) {
        let Some(mut at) = self.root() else {
            return;
        };
        let mut path = Vec::with_capacity(steps.len());
        for &step in steps {
            match self.node(at) {
                Some(Node::Split(split)) => {
                    path.push((*split, step));
                    at = split.child(step);
                }
                _ => return,
            }
        }
        let new = self.push(node);
        self.rebuild_path(&path, new);
    }
}
