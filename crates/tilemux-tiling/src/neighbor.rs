//! Spatial neighbor lookup over the split tree.
//!
//! Walks up from a leaf to the nearest split that can be crossed in the
//! requested direction, then down the far subtree to the leaf on the edge
//! closest to where we came from.

use serde::{Deserialize, Serialize};

use crate::tree::{Axis, LayoutTree, Node, Side, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Horizontal,
            Direction::Up | Direction::Down => Axis::Vertical,
        }
    }

    /// The child a leaf must sit in for a split to be crossable this way.
    fn source_step(self) -> Step {
        match self {
            Direction::Right | Direction::Down => Step::First,
            Direction::Left | Direction::Up => Step::Second,
        }
    }

    /// The insertion side that places a new pane in this direction.
    pub fn side(self) -> Side {
        match self {
            Direction::Left => Side::Left,
            Direction::Right => Side::Right,
            Direction::Up => Side::Top,
            Direction::Down => Side::Bottom,
        }
    }
}

impl<L: Clone + PartialEq> LayoutTree<L> {
    /// The leaf adjacent to `id` in `direction`, or `None` at the edge of
    /// the layout or when `id` is absent.
    pub fn find_directional_neighbor(&self, id: &L, direction: Direction) -> Option<L> {
        let (path, _) = self.locate_leaf(id)?;
        let axis = direction.axis();
        let from = direction.source_step();

        let (crossing, _) = path
            .iter()
            .rev()
            .find(|(split, step)| split.axis == axis && *step == from)?;

        let mut at = crossing.child(from.other());
        loop {
            match self.node(at)? {
                Node::Leaf(leaf) => return Some(leaf.clone()),
                Node::Split(split) if split.axis == axis => at = split.child(from),
                Node::Split(split) => at = split.first,
            }
        }
    }
}
