//! On-disk shape of a saved session.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use tilemux_common::TerminalId;
use tilemux_tiling::{Axis, NodeShape};

use crate::store::{TerminalSession, DEFAULT_PANEL_BOUNDS};

pub const SESSION_FORMAT_VERSION: u32 = 1;

/// Everything persisted between runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionDocument {
    pub version: u32,
    pub tree: Option<SnapshotNode>,
    pub floating: Vec<SavedPanel>,
    pub layouts: BTreeMap<String, LayoutSnapshot>,
    pub favorite_dirs: Vec<String>,
    pub recent_dirs: Vec<String>,
}

impl Default for SessionDocument {
    fn default() -> Self {
        Self {
            version: SESSION_FORMAT_VERSION,
            tree: None,
            floating: Vec::new(),
            layouts: BTreeMap::new(),
            favorite_dirs: Vec::new(),
            recent_dirs: Vec::new(),
        }
    }
}

/// A tree plus floating panels, without live process handles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSnapshot {
    pub tree: Option<SnapshotNode>,
    pub floating: Vec<SavedPanel>,
}

impl LayoutSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tree.is_none() && self.floating.is_empty()
    }

    pub fn terminal_count(&self) -> usize {
        self.tree.as_ref().map_or(0, SnapshotNode::leaf_count) + self.floating.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SnapshotNode {
    Leaf {
        terminal: SavedTerminal,
    },
    Split {
        axis: Axis,
        #[serde(default = "even_ratio")]
        ratio: f64,
        first: Box<SnapshotNode>,
        second: Box<SnapshotNode>,
    },
}

fn even_ratio() -> f64 {
    0.5
}

impl SnapshotNode {
    /// Capture a live tree shape, looking up each leaf's metadata.
    pub(crate) fn capture(
        shape: &NodeShape<TerminalId>,
        sessions: &HashMap<TerminalId, TerminalSession>,
    ) -> Self {
        match shape {
            NodeShape::Leaf { id } => SnapshotNode::Leaf {
                terminal: SavedTerminal::describe(sessions.get(id)),
            },
            NodeShape::Split {
                axis,
                ratio,
                first,
                second,
            } => SnapshotNode::Split {
                axis: *axis,
                ratio: *ratio,
                first: Box::new(Self::capture(first, sessions)),
                second: Box::new(Self::capture(second, sessions)),
            },
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            SnapshotNode::Leaf { .. } => 1,
            SnapshotNode::Split { first, second, .. } => first.leaf_count() + second.leaf_count(),
        }
    }

    /// Leaf metadata in first-before-second order.
    pub fn terminals(&self) -> Vec<&SavedTerminal> {
        match self {
            SnapshotNode::Leaf { terminal } => vec![terminal],
            SnapshotNode::Split { first, second, .. } => {
                let mut out = first.terminals();
                out.extend(second.terminals());
                out
            }
        }
    }

    /// Rebuild a tree shape from leaves restored in [`terminals`] order.
    /// A `None` drops its leaf, and a split left with one child collapses
    /// into that child.
    ///
    /// [`terminals`]: SnapshotNode::terminals
    pub(crate) fn rebuild(
        &self,
        restored: &mut impl Iterator<Item = Option<TerminalId>>,
    ) -> Option<NodeShape<TerminalId>> {
        match self {
            SnapshotNode::Leaf { .. } => restored.next().flatten().map(NodeShape::leaf),
            SnapshotNode::Split {
                axis,
                ratio,
                first,
                second,
            } => {
                let first = first.rebuild(restored);
                let second = second.rebuild(restored);
                match (first, second) {
                    (Some(a), Some(b)) => Some(NodeShape::split(*axis, *ratio, a, b)),
                    (Some(only), None) | (None, Some(only)) => Some(only),
                    (None, None) => None,
                }
            }
        }
    }
}

/// What a leaf or panel needs to start its shell again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavedTerminal {
    pub title: String,
    pub shell_profile_id: String,
    pub cwd: String,
    pub last_process: String,
    pub startup_command: String,
    pub custom_title: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_color: Option<String>,
}

impl Default for SavedTerminal {
    fn default() -> Self {
        Self {
            title: "Terminal".into(),
            shell_profile_id: String::new(),
            cwd: String::new(),
            last_process: String::new(),
            startup_command: String::new(),
            custom_title: false,
            tab_color: None,
        }
    }
}

impl SavedTerminal {
    fn describe(session: Option<&TerminalSession>) -> Self {
        session.map(Self::from).unwrap_or_default()
    }
}

impl From<&TerminalSession> for SavedTerminal {
    fn from(session: &TerminalSession) -> Self {
        Self {
            title: session.title.clone(),
            shell_profile_id: session.shell_profile_id.clone(),
            cwd: session.cwd.clone(),
            last_process: session.last_process.clone(),
            startup_command: session.startup_command.clone(),
            custom_title: session.custom_title,
            tab_color: session.tab_color.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPanel {
    pub terminal: SavedTerminal,
    #[serde(default = "default_x")]
    pub x: f64,
    #[serde(default = "default_y")]
    pub y: f64,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
}

impl SavedPanel {
    pub(crate) fn capture(
        id: &TerminalId,
        bounds: tilemux_common::Rect,
        sessions: &HashMap<TerminalId, TerminalSession>,
    ) -> Self {
        Self {
            terminal: SavedTerminal::describe(sessions.get(id)),
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
        }
    }

    pub fn bounds(&self) -> tilemux_common::Rect {
        tilemux_common::Rect::new(self.x, self.y, self.width, self.height)
    }
}

fn default_x() -> f64 {
    DEFAULT_PANEL_BOUNDS.x
}

fn default_y() -> f64 {
    DEFAULT_PANEL_BOUNDS.y
}

fn default_width() -> f64 {
    DEFAULT_PANEL_BOUNDS.width
}

fn default_height() -> f64 {
    DEFAULT_PANEL_BOUNDS.height
}

/// A named layout and how many terminals it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSummary {
    pub name: String,
    pub count: usize,
}
