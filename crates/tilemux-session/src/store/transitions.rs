//! Moves between tiled, floating, dormant and detached.
//!
//! Every transition first pulls the session out of whatever container its
//! current mode puts it in. A request for the mode a session is already in
//! does nothing, and so does an unknown id.

use tilemux_common::{Event, TerminalId, TerminalMode};
use tilemux_tiling::Side;

use super::{FloatingPanel, TerminalStore};

impl TerminalStore {
    /// Float a session in a panel that fills the viewport, on top of every
    /// other panel.
    pub fn move_to_float(&mut self, id: &TerminalId) -> bool {
        let Some(mode) = self.mode_of(id) else {
            tracing::debug!(%id, "move_to_float: unknown terminal");
            return false;
        };
        if mode == TerminalMode::Floating {
            return false;
        }
        self.take_out_of_layout(id, mode);
        let z = self.next_z_index();
        self.floating
            .push(FloatingPanel::maximized(id.clone(), self.viewport, z));
        self.set_mode(id, TerminalMode::Floating);
        self.set_focused(Some(id.clone()));
        self.clear_focus_mode_for(id);
        self.emit(Event::LayoutChanged);
        true
    }

    /// Tile a session beside `target` on `side`, or after the last pane
    /// when no usable target is given.
    pub fn move_to_tiling(
        &mut self,
        id: &TerminalId,
        target: Option<(&TerminalId, Side)>,
    ) -> bool {
        let Some(mode) = self.mode_of(id) else {
            tracing::debug!(%id, "move_to_tiling: unknown terminal");
            return false;
        };
        if mode == TerminalMode::Tiled {
            return false;
        }
        self.take_out_of_layout(id, mode);
        let placed = match target {
            Some((target, side)) if target != id => {
                self.tree.insert_leaf(target, id.clone(), side)
            }
            _ => false,
        };
        if !placed {
            self.append_tiled(id.clone());
        }
        self.set_mode(id, TerminalMode::Tiled);
        self.set_focused(Some(id.clone()));
        self.emit(Event::LayoutChanged);
        true
    }

    /// Hide a session while keeping its shell alive. Its tab stays.
    pub fn move_to_dormant(&mut self, id: &TerminalId) -> bool {
        let Some(mode) = self.mode_of(id) else {
            tracing::debug!(%id, "move_to_dormant: unknown terminal");
            return false;
        };
        if mode == TerminalMode::Dormant {
            return false;
        }
        self.take_out_of_layout(id, mode);
        self.set_mode(id, TerminalMode::Dormant);
        if self.focused.as_ref() == Some(id) {
            let next = self.first_visible();
            self.set_focused(next);
        }
        self.clear_focus_mode_for(id);
        self.emit(Event::LayoutChanged);
        true
    }

    /// Bring a dormant session back into the tree next to its neighbors in
    /// tab order: right of the nearest tiled tab before it, else left of
    /// the nearest tiled tab after it, else at the end.
    pub fn wake_from_dormant(&mut self, id: &TerminalId) -> bool {
        if self.mode_of(id) != Some(TerminalMode::Dormant) {
            tracing::debug!(%id, "wake_from_dormant: not dormant");
            return false;
        }

        if self.tree.is_empty() {
            self.tree.set_single_leaf(id.clone());
        } else {
            let placed = match self.tab_anchor(id) {
                Some((anchor, side)) => self.tree.insert_leaf(&anchor, id.clone(), side),
                None => false,
            };
            if !placed {
                self.append_tiled(id.clone());
            }
        }
        self.set_mode(id, TerminalMode::Tiled);
        self.set_focused(Some(id.clone()));
        self.emit(Event::LayoutChanged);
        true
    }

    /// Move a session into its own window. Its output is routed to that
    /// window through the hub until it comes back.
    pub fn detach_terminal(&mut self, id: &TerminalId) -> bool {
        let Some(mode) = self.mode_of(id) else {
            tracing::debug!(%id, "detach_terminal: unknown terminal");
            return false;
        };
        if mode == TerminalMode::Detached {
            return false;
        }
        self.take_out_of_layout(id, mode);
        self.set_mode(id, TerminalMode::Detached);

        let output = self.hub.subscribe_detached(id);
        self.surfaces.open_detached(id, output);

        let next = self.first_visible();
        self.set_focused(next);
        self.clear_focus_mode_for(id);
        self.emit(Event::LayoutChanged);
        tracing::info!(%id, "terminal detached");
        true
    }

    /// Close the detached window for `id` and tile the session at the end.
    pub fn reattach_terminal(&mut self, id: &TerminalId) -> bool {
        if self.mode_of(id) != Some(TerminalMode::Detached) {
            tracing::debug!(%id, "reattach_terminal: not detached");
            return false;
        }
        self.surfaces.close_detached(id);
        self.return_from_window(id)
    }

    /// The detached window for `id` was closed by its host.
    pub fn detached_closed(&mut self, id: &TerminalId) -> bool {
        if self.mode_of(id) != Some(TerminalMode::Detached) {
            tracing::debug!(%id, "detached_closed: not detached");
            return false;
        }
        self.return_from_window(id)
    }

    fn return_from_window(&mut self, id: &TerminalId) -> bool {
        self.hub.unsubscribe_detached(id);
        self.append_tiled(id.clone());
        self.set_mode(id, TerminalMode::Tiled);
        self.set_focused(Some(id.clone()));
        self.emit(Event::LayoutChanged);
        tracing::info!(%id, "terminal reattached");
        true
    }

    /// Nearest tiled tab around `id` and the side to insert on.
    fn tab_anchor(&self, id: &TerminalId) -> Option<(TerminalId, Side)> {
        let index = self.tab_order.iter().position(|t| t == id)?;
        let (before, after) = self.tab_order.split_at(index);
        if let Some(left) = before.iter().rev().find(|t| self.tree.contains(t)) {
            return Some((left.clone(), Side::Right));
        }
        after
            .iter()
            .skip(1)
            .find(|t| self.tree.contains(t))
            .map(|right| (right.clone(), Side::Left))
    }
}
