//! Keybind validation utilities.

use crate::schema::Keybinding;
use tilemux_common::ConfigError;
use std::collections::HashMap;

/// Returns all keybinds as `(action, key)` pairs.
pub fn all_keybinds(bindings: &[Keybinding]) -> Vec<(&str, &str)> {
    bindings
        .iter()
        .map(|k| (k.action.as_str(), k.key.as_str()))
        .collect()
}

/// Validate that no key combination is bound more than once.
///
/// The same action may be reachable from several keys, but each key
/// must resolve to exactly one action.
pub fn validate_no_duplicates(bindings: &[Keybinding]) -> Result<(), ConfigError> {
    let binds = all_keybinds(bindings);
    let mut seen: HashMap<&str, &str> = HashMap::new();

    for (name, binding) in &binds {
        if let Some(existing_name) = seen.get(binding) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate keybind '{binding}': assigned to both '{existing_name}' and '{name}'"
            )));
        }
        seen.insert(binding, name);
    }

    Ok(())
}

/// Validate that no binding has an empty action or key.
pub fn validate_not_empty(bindings: &[Keybinding]) -> Result<(), ConfigError> {
    match bindings
        .iter()
        .position(|k| k.action.trim().is_empty() || k.key.trim().is_empty())
    {
        Some(index) => Err(ConfigError::ValidationError(format!(
            "keybindings[{index}] has an empty action or key"
        ))),
        None => Ok(()),
    }
}
