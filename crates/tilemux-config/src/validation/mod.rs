//! Full configuration validation.
//!
//! Validates numeric ranges, shell profile consistency and keybind
//! uniqueness. Each domain has its own submodule; this orchestrator
//! calls them all and collects errors into a single `ConfigError`.

mod helpers;
mod session;
mod shells;
mod terminal;


use crate::keybinds;
use crate::schema::TilemuxConfig;
use tilemux_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TilemuxConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if let Err(e) = keybinds::validate_no_duplicates(&config.keybindings) {
        errors.push(e.to_string());
    }
    if let Err(e) = keybinds::validate_not_empty(&config.keybindings) {
        errors.push(e.to_string());
    }

    shells::validate_shells(&mut errors, config);
    terminal::validate_terminal(&mut errors, config);
    session::validate_session(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
