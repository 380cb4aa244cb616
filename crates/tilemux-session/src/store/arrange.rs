//! Rearranging panes and panels without changing any session's mode.

use tilemux_common::{Event, Rect, TerminalId};
use tilemux_tiling::{Direction, SplitId};

use super::{TerminalStore, DEFAULT_FONT_SIZE, DEFAULT_PANEL_BOUNDS, MAX_FONT_SIZE, MIN_FONT_SIZE};

impl TerminalStore {
    /// Move `dragged` to the tab position of `over`, then relabel the
    /// tree's leaves left to right so pane order follows tab order.
    pub fn reorder_terminals(&mut self, dragged: &TerminalId, over: &TerminalId) -> bool {
        if dragged == over {
            return false;
        }
        let from = self.tab_order.iter().position(|id| id == dragged);
        let to = self.tab_order.iter().position(|id| id == over);
        let (Some(from), Some(to)) = (from, to) else {
            tracing::debug!(%dragged, %over, "reorder_terminals: unknown terminal");
            return false;
        };

        let moved = self.tab_order.remove(from);
        self.tab_order.insert(to, moved);

        let tiled: Vec<TerminalId> = self
            .tab_order
            .iter()
            .filter(|id| self.tree.contains(id))
            .cloned()
            .collect();
        self.tree.relabel_leaves(&tiled);
        self.emit(Event::LayoutChanged);
        true
    }

    pub fn set_split_ratio(&mut self, split: SplitId, ratio: f64) -> bool {
        let changed = self.tree.update_split_ratio(split, ratio);
        if changed {
            self.emit(Event::LayoutChanged);
        }
        changed
    }

    pub fn swap_terminals(&mut self, a: &TerminalId, b: &TerminalId) -> bool {
        let changed = self.tree.swap_leaves(a, b);
        if changed {
            self.emit(Event::LayoutChanged);
        }
        changed
    }

    /// Swap `id` with the pane beside it in `direction`.
    pub fn move_terminal_direction(&mut self, id: &TerminalId, direction: Direction) -> bool {
        match self.tree.find_directional_neighbor(id, direction) {
            Some(neighbor) => self.swap_terminals(id, &neighbor),
            None => false,
        }
    }

    pub fn equalize_layout(&mut self) -> bool {
        let changed = self.tree.equalize();
        if changed {
            self.emit(Event::LayoutChanged);
        }
        changed
    }

    /// Move or resize a floating panel.
    pub fn update_floating_panel(&mut self, id: &TerminalId, bounds: Rect) -> bool {
        let Some(panel) = self.floating.iter_mut().find(|p| &p.terminal_id == id) else {
            tracing::debug!(%id, "update_floating_panel: not floating");
            return false;
        };
        panel.set_bounds(bounds);
        self.emit(Event::LayoutChanged);
        true
    }

    /// Maximize a floating panel to the viewport, or put it back where it
    /// was before.
    pub fn toggle_maximize(&mut self, id: &TerminalId) -> bool {
        let viewport = self.viewport;
        let Some(panel) = self.floating.iter_mut().find(|p| &p.terminal_id == id) else {
            tracing::debug!(%id, "toggle_maximize: not floating");
            return false;
        };
        if panel.maximized {
            let restore = panel.saved_bounds.take().unwrap_or(DEFAULT_PANEL_BOUNDS);
            panel.set_bounds(restore);
            panel.maximized = false;
        } else {
            panel.saved_bounds = Some(panel.bounds());
            panel.set_bounds(viewport);
            panel.maximized = true;
        }
        self.emit(Event::LayoutChanged);
        true
    }

    /// Record the area the layout fills. Maximized panels follow it.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        for panel in self.floating.iter_mut().filter(|p| p.maximized) {
            panel.set_bounds(viewport);
        }
        self.emit(Event::LayoutChanged);
    }

    pub fn zoom_in(&mut self) -> u32 {
        self.font_size = (self.font_size + 1).min(MAX_FONT_SIZE);
        self.font_size
    }

    pub fn zoom_out(&mut self) -> u32 {
        self.font_size = self.font_size.saturating_sub(1).max(MIN_FONT_SIZE);
        self.font_size
    }

    /// Back to the configured terminal font size.
    pub fn zoom_reset(&mut self) -> u32 {
        self.font_size = self
            .config
            .config()
            .map(|c| c.terminal.font_size)
            .unwrap_or(DEFAULT_FONT_SIZE);
        self.font_size
    }
}
