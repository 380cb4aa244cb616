//! Binary-tree tiling layout.
//!
//! [`LayoutTree`] stores panes as leaves of an arena-backed binary tree
//! whose nodes are never mutated in place: every structural change copies
//! the root-to-node path and shares the rest. [`LayoutEngine`] maps the
//! leaves to rectangles, and [`Direction`] drives spatial neighbor lookup.

pub mod layout;
pub mod neighbor;
pub mod tree;

pub use layout::LayoutEngine;
pub use neighbor::Direction;
pub use tree::{Axis, LayoutTree, Node, NodeId, NodeShape, Side, Split, SplitId, Step};
