//! Core types for the split tree: axes, sides, path steps and arena nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_RATIO: f64 = 0.1;
pub const MAX_RATIO: f64 = 0.9;

/// Clamp a split ratio into `[MIN_RATIO, MAX_RATIO]`. NaN becomes an even split.
pub fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.5
    } else {
        ratio.clamp(MIN_RATIO, MAX_RATIO)
    }
}

/// Orientation of a split. `Horizontal` places children side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Where a new leaf goes relative to the leaf it is inserted beside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
    Top,
    Bottom,
}

impl Side {
    pub fn axis(self) -> Axis {
        match self {
            Side::Left | Side::Right => Axis::Horizontal,
            Side::Top | Side::Bottom => Axis::Vertical,
        }
    }

    /// Left and top put the new leaf in the `first` slot.
    pub fn new_is_first(self) -> bool {
        matches!(self, Side::Left | Side::Top)
    }

    /// The default side for splitting along `axis`.
    pub fn default_for(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Side::Right,
            Axis::Vertical => Side::Bottom,
        }
    }
}

/// One step from a split to one of its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    First,
    Second,
}

impl Step {
    pub fn other(self) -> Self {
        match self {
            Step::First => Step::Second,
            Step::Second => Step::First,
        }
    }
}

/// Handle into a tree's node arena. Only meaningful for the tree that
/// produced it, and only until the next `compact()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Stable identity of a split. Survives path copies and compaction, so a
/// resize gesture can address the split it started on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SplitId(pub u64);

impl fmt::Display for SplitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "split-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Split {
    pub id: SplitId,
    pub axis: Axis,
    pub ratio: f64,
    pub first: NodeId,
    pub second: NodeId,
}

impl Split {
    pub fn child(&self, step: Step) -> NodeId {
        match step {
            Step::First => self.first,
            Step::Second => self.second,
        }
    }

    pub(crate) fn with_child(mut self, step: Step, child: NodeId) -> Self {
        match step {
            Step::First => self.first = child,
            Step::Second => self.second = child,
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node<L> {
    Leaf(L),
    Split(Split),
}

/// Owned, recursive view of a tree, used for building trees in one go and
/// for handing the shape to serializers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeShape<L> {
    Leaf {
        id: L,
    },
    Split {
        axis: Axis,
        ratio: f64,
        first: Box<NodeShape<L>>,
        second: Box<NodeShape<L>>,
    },
}

impl<L> NodeShape<L> {
    pub fn leaf(id: L) -> Self {
        NodeShape::Leaf { id }
    }

    pub fn split(axis: Axis, ratio: f64, first: NodeShape<L>, second: NodeShape<L>) -> Self {
        NodeShape::Split {
            axis,
            ratio,
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    pub fn split_h(first: NodeShape<L>, second: NodeShape<L>) -> Self {
        Self::split(Axis::Horizontal, 0.5, first, second)
    }

    pub fn split_v(first: NodeShape<L>, second: NodeShape<L>) -> Self {
        Self::split(Axis::Vertical, 0.5, first, second)
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            NodeShape::Leaf { .. } => 1,
            NodeShape::Split { first, second, .. } => first.leaf_count() + second.leaf_count(),
        }
    }

    /// Collect leaf ids in first-before-second order.
    pub fn leaves(&self) -> Vec<&L> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into<'a>(&'a self, out: &mut Vec<&'a L>) {
        match self {
            NodeShape::Leaf { id } => out.push(id),
            NodeShape::Split { first, second, .. } => {
                first.collect_into(out);
                second.collect_into(out);
            }
        }
    }
}
