//! Layout engine types and configuration.

/// Configuration for the layout engine that computes pane positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutEngine {
    /// Gap in pixels between panes.
    pub gap: u32,
    /// Outer padding in pixels around the entire tiling area.
    pub outer_padding: u32,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self {
            gap: 4,
            outer_padding: 0,
        }
    }
}
