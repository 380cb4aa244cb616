//! Session persistence settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seconds between autosave ticks (1-3600).
    pub autosave_interval_secs: u64,
    /// Restore the last session at startup instead of opening a fresh terminal.
    pub restore_on_startup: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            autosave_interval_secs: 5,
            restore_on_startup: true,
        }
    }
}
