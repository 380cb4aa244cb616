//! Shell profile validation: unique ids, non-empty paths, and a default
//! that points at an existing profile.

use std::collections::HashSet;

use crate::schema::TilemuxConfig;

pub(super) fn validate_shells(errors: &mut Vec<String>, config: &TilemuxConfig) {
    let mut seen = HashSet::new();
    for shell in &config.shells {
        if shell.id.trim().is_empty() {
            errors.push(format!("shell '{}' has an empty id", shell.name));
            continue;
        }
        if !seen.insert(shell.id.as_str()) {
            errors.push(format!("duplicate shell id '{}'", shell.id));
        }
        if shell.path.trim().is_empty() {
            errors.push(format!("shell '{}' has an empty path", shell.id));
        }
    }

    if config.find_profile(&config.default_shell_id).is_none() {
        errors.push(format!(
            "default_shell_id '{}' does not match any shell",
            config.default_shell_id
        ));
    }
}
