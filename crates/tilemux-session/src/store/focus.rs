use tilemux_common::{Event, TerminalId, TerminalMode};
use tilemux_tiling::Direction;

use super::TerminalStore;

impl TerminalStore {
    /// Point focus at `id`.
    ///
    /// A dormant session only gets the pointer; waking is a separate
    /// request. A detached session also has its window raised, and a
    /// floating one is lifted above the other panels. Focusing another
    /// tiled pane ends focus mode.
    pub fn set_focus(&mut self, id: &TerminalId) -> bool {
        let Some(mode) = self.mode_of(id) else {
            tracing::debug!(%id, "set_focus: unknown terminal");
            return false;
        };
        match mode {
            TerminalMode::Dormant => {}
            TerminalMode::Detached => self.surfaces.focus_detached(id),
            TerminalMode::Floating => {
                let z = self.next_z_index();
                if let Some(panel) = self.floating.iter_mut().find(|p| &p.terminal_id == id) {
                    panel.z_index = z;
                }
                self.emit(Event::LayoutChanged);
            }
            TerminalMode::Tiled => {
                if self.focus_mode.as_ref().is_some_and(|f| f != id) {
                    self.focus_mode = None;
                    self.emit(Event::LayoutChanged);
                }
            }
        }
        self.set_focused(Some(id.clone()));
        true
    }

    pub fn focus_next(&mut self) -> bool {
        self.cycle_focus(true)
    }

    pub fn focus_prev(&mut self) -> bool {
        self.cycle_focus(false)
    }

    /// Step through visible tabs in tab order, wrapping at either end.
    fn cycle_focus(&mut self, forward: bool) -> bool {
        let order: Vec<TerminalId> = self
            .tab_order
            .iter()
            .filter(|id| self.is_visible(id))
            .cloned()
            .collect();
        if order.is_empty() {
            return false;
        }

        let current = self
            .focused
            .as_ref()
            .and_then(|f| order.iter().position(|id| id == f));
        let len = order.len();
        let next = match (current, forward) {
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
            (None, true) => 0,
            (None, false) => len - 1,
        };
        self.set_focus(&order[next])
    }

    /// Move focus to the pane beside the focused one.
    pub fn focus_direction(&mut self, direction: Direction) -> bool {
        let Some(focused) = self.focused.clone() else {
            return false;
        };
        match self.tree.find_directional_neighbor(&focused, direction) {
            Some(neighbor) => {
                self.set_focused(Some(neighbor));
                true
            }
            None => false,
        }
    }

    /// Show `id` (the focused terminal when `None`) alone, or turn focus
    /// mode off if it is already showing that terminal.
    pub fn toggle_focus_mode(&mut self, id: Option<&TerminalId>) -> bool {
        let Some(target) = id.or(self.focused.as_ref()).cloned() else {
            return false;
        };
        if !self.sessions.contains_key(&target) {
            tracing::debug!(id = %target, "toggle_focus_mode: unknown terminal");
            return false;
        }
        if self.focus_mode.as_ref() == Some(&target) {
            self.focus_mode = None;
        } else {
            self.focus_mode = Some(target.clone());
            self.set_focused(Some(target));
        }
        self.emit(Event::LayoutChanged);
        true
    }
}
