use serde::{Deserialize, Serialize};

use tilemux_common::{Rect, TerminalId, TerminalMode};
use tilemux_tiling::NodeShape;

/// z-index handed to the first floating panel.
pub const FIRST_Z_INDEX: u32 = 100;

pub const MIN_FONT_SIZE: u32 = 8;
pub const MAX_FONT_SIZE: u32 = 32;
pub const DEFAULT_FONT_SIZE: u32 = 14;

/// Bounds a floating panel returns to when un-maximized without any
/// remembered position.
pub const DEFAULT_PANEL_BOUNDS: Rect = Rect {
    x: 200.0,
    y: 150.0,
    width: 600.0,
    height: 400.0,
};

/// Area floating panels maximize into until the host reports its size.
pub const DEFAULT_VIEWPORT: Rect = Rect {
    x: 0.0,
    y: 0.0,
    width: 1280.0,
    height: 720.0,
};

/// Most-recently-used directories kept.
pub const MAX_RECENT_DIRS: usize = 10;

/// One shell and everything the tab bar knows about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminalSession {
    pub id: TerminalId,
    pub title: String,
    /// Set once the user renames the tab; shell title reports stop
    /// overwriting it.
    pub custom_title: bool,
    pub shell_profile_id: String,
    pub cwd: String,
    pub mode: TerminalMode,
    pub pid: Option<u32>,
    pub last_process: String,
    /// Written to the shell after a restore.
    pub startup_command: String,
    pub tab_color: Option<String>,
}

impl TerminalSession {
    pub(crate) fn tiled(
        id: TerminalId,
        title: impl Into<String>,
        shell_profile_id: impl Into<String>,
        cwd: impl Into<String>,
        pid: Option<u32>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            custom_title: false,
            shell_profile_id: shell_profile_id.into(),
            cwd: cwd.into(),
            mode: TerminalMode::Tiled,
            pid,
            last_process: String::new(),
            startup_command: String::new(),
            tab_color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatingPanel {
    pub terminal_id: TerminalId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub z_index: u32,
    pub maximized: bool,
    /// Bounds to return to when un-maximizing.
    pub saved_bounds: Option<Rect>,
}

impl FloatingPanel {
    pub(crate) fn new(terminal_id: TerminalId, bounds: Rect, z_index: u32) -> Self {
        Self {
            terminal_id,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            z_index,
            maximized: false,
            saved_bounds: None,
        }
    }

    pub(crate) fn maximized(terminal_id: TerminalId, viewport: Rect, z_index: u32) -> Self {
        Self {
            maximized: true,
            ..Self::new(terminal_id, viewport, z_index)
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub(crate) fn set_bounds(&mut self, bounds: Rect) {
        self.x = bounds.x;
        self.y = bounds.y;
        self.width = bounds.width;
        self.height = bounds.height;
    }
}

/// Serializable picture of the whole store, as returned to drivers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreView {
    /// Sessions in tab order.
    pub tabs: Vec<TerminalSession>,
    pub tree: Option<NodeShape<TerminalId>>,
    pub floating: Vec<FloatingPanel>,
    /// Pane rectangles for tiled sessions inside the viewport.
    pub geometry: Vec<(TerminalId, Rect)>,
    pub focused: Option<TerminalId>,
    pub focus_mode: Option<TerminalId>,
    pub font_size: u32,
    pub viewport: Rect,
    pub favorite_dirs: Vec<String>,
    pub recent_dirs: Vec<String>,
}
