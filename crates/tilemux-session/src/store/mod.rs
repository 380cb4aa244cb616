//! The terminal session store.
//!
//! Owns the session map, the tab order, the tiling tree and the floating
//! panel list, and keeps them in agreement with each session's
//! [`TerminalMode`]: a tiled session is a leaf of the tree, a floating one
//! has exactly one panel, and dormant or detached sessions are in neither.
//!
//! Operations are split by concern:
//! - `lifecycle`: create, split, close, PTY events and IO
//! - `transitions`: moves between tiled, floating, dormant and detached
//! - `focus`: focus pointer, cycling, directional focus, focus mode
//! - `arrange`: ratios, swaps, reorder, floating geometry, zoom
//! - `metadata`: titles, colors, directories, configuration

mod arrange;
mod focus;
pub(crate) mod lifecycle;
pub(crate) mod metadata;
mod transitions;
mod types;


pub use types::*;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::broadcast;

use tilemux_common::{Event, EventBus, Rect, TerminalId, TerminalMode};
use tilemux_pty::PtyRegistry;
use tilemux_tiling::{LayoutEngine, LayoutTree, Side};

use crate::collab::{ConfigSource, DetachedSurfaces, NoDetachedSurfaces};
use crate::hub::SurfaceHub;
use crate::persistence::{BlobStore, LayoutSnapshot};

pub struct TerminalStore {
    pub(crate) config: Arc<dyn ConfigSource>,
    pub(crate) ptys: Arc<dyn PtyRegistry>,
    pub(crate) blobs: Arc<dyn BlobStore>,
    pub(crate) surfaces: Arc<dyn DetachedSurfaces>,
    pub(crate) hub: SurfaceHub,
    pub(crate) events: EventBus,
    pub(crate) engine: LayoutEngine,

    pub(crate) sessions: HashMap<TerminalId, TerminalSession>,
    pub(crate) tab_order: Vec<TerminalId>,
    pub(crate) tree: LayoutTree<TerminalId>,
    pub(crate) floating: Vec<FloatingPanel>,
    pub(crate) next_z: u32,
    pub(crate) focused: Option<TerminalId>,
    /// Terminal shown alone while focus mode is on.
    pub(crate) focus_mode: Option<TerminalId>,
    pub(crate) font_size: u32,
    pub(crate) viewport: Rect,
    pub(crate) favorite_dirs: Vec<String>,
    pub(crate) recent_dirs: Vec<String>,
    /// Named layouts, kept in memory so every save writes them back.
    pub(crate) layouts: BTreeMap<String, LayoutSnapshot>,
}

impl TerminalStore {
    pub fn new(
        config: Arc<dyn ConfigSource>,
        ptys: Arc<dyn PtyRegistry>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let font_size = config
            .config()
            .map(|c| c.terminal.font_size)
            .unwrap_or(DEFAULT_FONT_SIZE);
        Self {
            config,
            ptys,
            blobs,
            surfaces: Arc::new(NoDetachedSurfaces),
            hub: SurfaceHub::new(),
            events: EventBus::default(),
            engine: LayoutEngine::default(),
            sessions: HashMap::new(),
            tab_order: Vec::new(),
            tree: LayoutTree::new(),
            floating: Vec::new(),
            next_z: FIRST_Z_INDEX,
            focused: None,
            focus_mode: None,
            font_size,
            viewport: DEFAULT_VIEWPORT,
            favorite_dirs: Vec::new(),
            recent_dirs: Vec::new(),
            layouts: BTreeMap::new(),
        }
    }

    pub fn with_detached(mut self, surfaces: Arc<dyn DetachedSurfaces>) -> Self {
        self.surfaces = surfaces;
        self
    }

    pub fn with_hub(mut self, hub: SurfaceHub) -> Self {
        self.hub = hub;
        self
    }

    pub fn with_events(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn with_layout_engine(mut self, engine: LayoutEngine) -> Self {
        self.engine = engine;
        self
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    pub fn session(&self, id: &TerminalId) -> Option<&TerminalSession> {
        self.sessions.get(id)
    }

    /// Sessions in tab order.
    pub fn sessions(&self) -> Vec<&TerminalSession> {
        self.tab_order
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .collect()
    }

    pub fn tab_order(&self) -> &[TerminalId] {
        &self.tab_order
    }

    pub fn mode_of(&self, id: &TerminalId) -> Option<TerminalMode> {
        self.sessions.get(id).map(|s| s.mode)
    }

    pub fn tree(&self) -> &LayoutTree<TerminalId> {
        &self.tree
    }

    pub fn floating_panels(&self) -> &[FloatingPanel] {
        &self.floating
    }

    pub fn panel(&self, id: &TerminalId) -> Option<&FloatingPanel> {
        self.floating.iter().find(|p| &p.terminal_id == id)
    }

    pub fn focused(&self) -> Option<&TerminalId> {
        self.focused.as_ref()
    }

    pub fn focus_mode(&self) -> Option<&TerminalId> {
        self.focus_mode.as_ref()
    }

    pub fn font_size(&self) -> u32 {
        self.font_size
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn favorite_dirs(&self) -> &[String] {
        &self.favorite_dirs
    }

    pub fn recent_dirs(&self) -> &[String] {
        &self.recent_dirs
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn hub(&self) -> &SurfaceHub {
        &self.hub
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn view(&self) -> StoreView {
        StoreView {
            tabs: self.sessions().into_iter().cloned().collect(),
            tree: self.tree.to_shape(),
            floating: self.floating.clone(),
            geometry: self.engine.compute(&self.tree, self.viewport),
            focused: self.focused.clone(),
            focus_mode: self.focus_mode.clone(),
            font_size: self.font_size,
            viewport: self.viewport,
            favorite_dirs: self.favorite_dirs.clone(),
            recent_dirs: self.recent_dirs.clone(),
        }
    }

    /// Verify that modes, tree leaves, panels, tab order and focus agree.
    pub fn check_invariants(&self) -> Result<(), String> {
        let leaves = self.tree.leaf_order();
        let mut seen = HashSet::new();
        for leaf in &leaves {
            if !seen.insert(leaf) {
                return Err(format!("leaf {leaf} appears twice in the tree"));
            }
            match self.mode_of(leaf) {
                Some(TerminalMode::Tiled) => {}
                Some(mode) => return Err(format!("leaf {leaf} belongs to a {mode} session")),
                None => return Err(format!("leaf {leaf} has no session")),
            }
        }
        if leaves.len() != self.tree.leaf_count() {
            return Err("tree leaf count is stale".into());
        }

        let mut panels = HashSet::new();
        for panel in &self.floating {
            let id = &panel.terminal_id;
            if !panels.insert(id) {
                return Err(format!("terminal {id} has two floating panels"));
            }
            if self.mode_of(id) != Some(TerminalMode::Floating) {
                return Err(format!("panel {id} does not belong to a floating session"));
            }
        }

        for session in self.sessions.values() {
            let id = &session.id;
            let in_tree = seen.contains(id);
            let in_panels = panels.contains(id);
            let ok = match session.mode {
                TerminalMode::Tiled => in_tree && !in_panels,
                TerminalMode::Floating => in_panels && !in_tree,
                TerminalMode::Dormant | TerminalMode::Detached => !in_tree && !in_panels,
            };
            if !ok {
                return Err(format!("{} session {id} is in the wrong container", session.mode));
            }
        }

        let tabs: HashSet<_> = self.tab_order.iter().collect();
        if tabs.len() != self.tab_order.len() || tabs.len() != self.sessions.len() {
            return Err("tab order does not match the session map".into());
        }
        if tabs.iter().any(|id| !self.sessions.contains_key(*id)) {
            return Err("tab order names an unknown session".into());
        }

        for (what, pointer) in [("focus", &self.focused), ("focus mode", &self.focus_mode)] {
            if let Some(id) = pointer {
                if !self.sessions.contains_key(id) {
                    return Err(format!("{what} points at unknown session {id}"));
                }
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Shared helpers
    // -------------------------------------------------------------------------

    pub(crate) fn emit(&self, event: Event) {
        self.events.publish(event);
    }

    pub(crate) fn register(&mut self, session: TerminalSession) {
        let id = session.id.clone();
        self.tab_order.push(id.clone());
        self.sessions.insert(id.clone(), session);
        self.emit(Event::TerminalOpened(id));
    }

    /// Remove a session that is already out of every container, then fix
    /// up focus: the first tiled leaf, else the topmost-added floating
    /// panel, else nothing.
    pub(crate) fn unregister(&mut self, id: &TerminalId) -> Option<TerminalSession> {
        let session = self.sessions.remove(id)?;
        self.tab_order.retain(|t| t != id);
        if self.focused.as_ref() == Some(id) {
            let next = self
                .tree
                .first_leaf()
                .or_else(|| self.floating.last().map(|p| p.terminal_id.clone()));
            self.set_focused(next);
        }
        self.clear_focus_mode_for(id);
        self.emit(Event::TerminalClosed(id.clone()));
        self.emit(Event::LayoutChanged);
        Some(session)
    }

    /// Pull `id` out of the container its `mode` puts it in. A detached
    /// session loses its window.
    pub(crate) fn take_out_of_layout(&mut self, id: &TerminalId, mode: TerminalMode) {
        match mode {
            TerminalMode::Tiled => {
                self.tree.remove_leaf(id);
            }
            TerminalMode::Floating => self.floating.retain(|p| &p.terminal_id != id),
            TerminalMode::Detached => {
                self.surfaces.close_detached(id);
                self.hub.unsubscribe_detached(id);
            }
            TerminalMode::Dormant => {}
        }
    }

    /// Put `id` at the end of the tree, or make it the tree.
    pub(crate) fn append_tiled(&mut self, id: TerminalId) {
        match self.tree.last_leaf() {
            Some(last) => {
                self.tree.insert_leaf(&last, id, Side::Right);
            }
            None => self.tree.set_single_leaf(id),
        }
    }

    pub(crate) fn set_mode(&mut self, id: &TerminalId, mode: TerminalMode) {
        if let Some(session) = self.sessions.get_mut(id) {
            session.mode = mode;
            self.emit(Event::ModeChanged {
                id: id.clone(),
                mode,
            });
        }
    }

    pub(crate) fn set_focused(&mut self, id: Option<TerminalId>) {
        if self.focused != id {
            self.focused = id.clone();
            self.emit(Event::TerminalFocused(id));
        }
    }

    pub(crate) fn clear_focus_mode_for(&mut self, id: &TerminalId) {
        if self.focus_mode.as_ref() == Some(id) {
            self.focus_mode = None;
        }
    }

    /// First visible session: tiled leaves before floating panels.
    pub(crate) fn first_visible(&self) -> Option<TerminalId> {
        self.tree
            .first_leaf()
            .or_else(|| self.floating.first().map(|p| p.terminal_id.clone()))
    }

    pub(crate) fn next_z_index(&mut self) -> u32 {
        let z = self.next_z;
        self.next_z += 1;
        z
    }
}
