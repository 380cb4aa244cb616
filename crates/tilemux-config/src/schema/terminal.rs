//! Terminal defaults applied to every new pane.

use serde::{Deserialize, Serialize};

/// Font and scrollback defaults. `font_size` is also the zoom reset target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalDefaults {
    /// Font size in points (8-32).
    pub font_size: u32,
    pub font_family: String,
    /// Lines kept above the viewport (0-100000).
    pub scrollback: u32,
}

impl Default for TerminalDefaults {
    fn default() -> Self {
        Self {
            font_size: 14,
            font_family:
                "CaskaydiaCove Nerd Font, CaskaydiaCove NF, Cascadia Code, Consolas, monospace"
                    .into(),
            scrollback: 5000,
        }
    }
}
