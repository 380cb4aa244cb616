//! Requests the actor accepts and what it answers.
//!
//! Both are serde types so a driver can speak them as JSON, one object per
//! line: `{"cmd": "split", "target": "…", "axis": "vertical"}`.

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use tilemux_common::{Rect, TerminalId};
use tilemux_config::TilemuxConfig;
use tilemux_tiling::{Axis, Direction, Side, SplitId};

use crate::error::StoreError;
use crate::persistence::LayoutSummary;
use crate::store::StoreView;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    // -- lifecycle --
    Create {
        #[serde(default)]
        profile: Option<String>,
    },
    Split {
        target: TerminalId,
        axis: Axis,
        #[serde(default)]
        side: Option<Side>,
    },
    Close {
        id: TerminalId,
    },
    Write {
        id: TerminalId,
        data: String,
    },
    Resize {
        id: TerminalId,
        cols: u16,
        rows: u16,
    },

    // -- modes --
    MoveToFloat {
        id: TerminalId,
    },
    MoveToTiling {
        id: TerminalId,
        #[serde(default)]
        target: Option<TerminalId>,
        #[serde(default)]
        side: Option<Side>,
    },
    MoveToDormant {
        id: TerminalId,
    },
    WakeFromDormant {
        id: TerminalId,
    },
    Detach {
        id: TerminalId,
    },
    Reattach {
        id: TerminalId,
    },
    /// The host closed a detached window.
    DetachedClosed {
        id: TerminalId,
    },

    // -- focus --
    SetFocus {
        id: TerminalId,
    },
    FocusNext,
    FocusPrev,
    FocusDirection {
        direction: Direction,
    },
    ToggleFocusMode {
        #[serde(default)]
        id: Option<TerminalId>,
    },

    // -- arrangement --
    Reorder {
        dragged: TerminalId,
        over: TerminalId,
    },
    SetSplitRatio {
        split: SplitId,
        ratio: f64,
    },
    Swap {
        a: TerminalId,
        b: TerminalId,
    },
    MoveDirection {
        id: TerminalId,
        direction: Direction,
    },
    Equalize,
    UpdateFloatingPanel {
        id: TerminalId,
        bounds: Rect,
    },
    ToggleMaximize {
        id: TerminalId,
    },
    SetViewport {
        bounds: Rect,
    },
    ZoomIn,
    ZoomOut,
    ZoomReset,

    // -- metadata --
    Rename {
        id: TerminalId,
        title: String,
        #[serde(default)]
        custom: Option<bool>,
    },
    SetTabColor {
        id: TerminalId,
        #[serde(default)]
        color: Option<String>,
    },
    SetStartupCommand {
        id: TerminalId,
        command: String,
    },
    ReportTitle {
        id: TerminalId,
        title: String,
    },
    AddFavoriteDir {
        dir: String,
    },
    RemoveFavoriteDir {
        dir: String,
    },
    AddRecentDir {
        dir: String,
    },
    RemoveRecentDir {
        dir: String,
    },
    CdToDir {
        dir: String,
    },
    UpdateConfig {
        config: Box<TilemuxConfig>,
    },

    // -- persistence --
    Save,
    Restore,
    LoadSavedState,
    SaveLayout {
        name: String,
    },
    LoadLayout {
        name: String,
    },
    DeleteLayout {
        name: String,
    },
    LayoutNames,

    State,
    Shutdown,
}

impl Command {
    /// Directory list edits are written out right away instead of
    /// waiting for the next autosave.
    pub fn touches_directories(&self) -> bool {
        matches!(
            self,
            Command::AddFavoriteDir { .. }
                | Command::RemoveFavoriteDir { .. }
                | Command::AddRecentDir { .. }
                | Command::RemoveRecentDir { .. }
                | Command::CdToDir { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reply", content = "value", rename_all = "snake_case")]
pub enum Reply {
    Done,
    /// Whether the request changed anything.
    Changed(bool),
    Created(Option<TerminalId>),
    FontSize(u32),
    Layouts(Vec<LayoutSummary>),
    State(Box<StoreView>),
}

/// A command in flight, with the slot its reply goes into.
pub(crate) struct Request {
    pub command: Command,
    pub reply: oneshot::Sender<Result<Reply, StoreError>>,
}
