//! Layout calculation: recursive tree-to-rect computation.

use tilemux_common::types::Rect;

use crate::tree::{Axis, LayoutTree, Node, NodeId};

use super::LayoutEngine;

impl LayoutEngine {
    /// Rectangles for every leaf, in leaf order. Empty for an empty tree.
    pub fn compute<L: Clone + PartialEq>(&self, tree: &LayoutTree<L>, bounds: Rect) -> Vec<(L, Rect)> {
        let mut results = Vec::with_capacity(tree.leaf_count());
        if let Some(root) = tree.root() {
            let inner = bounds.inset(self.outer_padding as f64);
            self.layout_node(tree, root, inner, &mut results);
        }
        results
    }

    fn layout_node<L: Clone + PartialEq>(
        &self,
        tree: &LayoutTree<L>,
        at: NodeId,
        bounds: Rect,
        out: &mut Vec<(L, Rect)>,
    ) {
        match tree.node(at) {
            Some(Node::Leaf(id)) => out.push((id.clone(), bounds)),
            Some(Node::Split(split)) => {
                let (a, b) = self.divide(bounds, split.axis, split.ratio);
                self.layout_node(tree, split.first, a, out);
                self.layout_node(tree, split.second, b, out);
            }
            None => {}
        }
    }

    fn divide(&self, bounds: Rect, axis: Axis, ratio: f64) -> (Rect, Rect) {
        let gap = self.gap as f64;
        match axis {
            Axis::Horizontal => {
                let available_width = (bounds.width - gap).max(0.0);
                let w1 = available_width * ratio;
                let w2 = (available_width - w1).max(0.0);
                (
                    Rect::new(bounds.x, bounds.y, w1, bounds.height),
                    Rect::new(bounds.x + w1 + gap, bounds.y, w2, bounds.height),
                )
            }
            Axis::Vertical => {
                let available_height = (bounds.height - gap).max(0.0);
                let h1 = available_height * ratio;
                let h2 = (available_height - h1).max(0.0);
                (
                    Rect::new(bounds.x, bounds.y, bounds.width, h1),
                    Rect::new(bounds.x, bounds.y + h1 + gap, bounds.width, h2),
                )
            }
        }
    }
}
