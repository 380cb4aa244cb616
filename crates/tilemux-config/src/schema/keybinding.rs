//! Keybinding table entries.
//!
//! The table maps key combinations to action names. Translating key
//! events into actions is left to the front end; tilemux only stores,
//! validates and persists the table.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keybinding {
    pub action: String,
    pub key: String,
}

impl Keybinding {
    pub fn new(action: &str, key: &str) -> Self {
        Self {
            action: action.into(),
            key: key.into(),
        }
    }
}

/// Default bindings. An action may appear under more than one key.
pub fn default_keybindings() -> Vec<Keybinding> {
    [
        ("createTerminal", "Ctrl+Shift+N"),
        ("closeTerminal", "Ctrl+Shift+W"),
        ("focusUp", "Shift+ArrowUp"),
        ("focusDown", "Shift+ArrowDown"),
        ("focusLeft", "Shift+ArrowLeft"),
        ("focusRight", "Shift+ArrowRight"),
        ("moveRight", "Ctrl+Shift+ArrowRight"),
        ("moveDown", "Ctrl+Shift+ArrowDown"),
        ("moveLeft", "Ctrl+Shift+ArrowLeft"),
        ("moveUp", "Ctrl+Shift+ArrowUp"),
        ("splitHorizontal", "Ctrl+Alt+ArrowRight"),
        ("splitHorizontalLeft", "Ctrl+Alt+ArrowLeft"),
        ("splitVertical", "Ctrl+Alt+ArrowDown"),
        ("splitVerticalUp", "Ctrl+Alt+ArrowUp"),
        ("toggleFocusMode", "Ctrl+Shift+F"),
        ("resizeUp", "Ctrl+Shift+Alt+ArrowUp"),
        ("resizeDown", "Ctrl+Shift+Alt+ArrowDown"),
        ("resizeLeft", "Ctrl+Shift+Alt+ArrowLeft"),
        ("resizeRight", "Ctrl+Shift+Alt+ArrowRight"),
        ("resizeRight", "Ctrl+ArrowRight"),
        ("resizeLeft", "Ctrl+ArrowLeft"),
        ("resizeDown", "Ctrl+ArrowDown"),
        ("resizeUp", "Ctrl+ArrowUp"),
    ]
    .iter()
    .map(|(action, key)| Keybinding::new(action, key))
    .collect()
}
