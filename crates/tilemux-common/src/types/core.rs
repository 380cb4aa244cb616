use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrink the rect by `amount` on every side, never below zero size.
    pub fn inset(&self, amount: f64) -> Self {
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - amount * 2.0).max(0.0),
            height: (self.height - amount * 2.0).max(0.0),
        }
    }
}

/// Presentation mode of a terminal session. Exactly one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminalMode {
    Tiled,
    Floating,
    Dormant,
    Detached,
}

impl TerminalMode {
    /// Whether the session has a pane in the main window.
    pub fn is_visible(self) -> bool {
        matches!(self, TerminalMode::Tiled | TerminalMode::Floating)
    }
}

impl fmt::Display for TerminalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TerminalMode::Tiled => "tiled",
            TerminalMode::Floating => "floating",
            TerminalMode::Dormant => "dormant",
            TerminalMode::Detached => "detached",
        };
        f.write_str(name)
    }
}
