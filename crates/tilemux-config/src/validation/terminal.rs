//! Terminal defaults validation.

use super::helpers::validate_range;
use crate::schema::TilemuxConfig;

pub(super) fn validate_terminal(errors: &mut Vec<String>, config: &TilemuxConfig) {
    let t = &config.terminal;
    validate_range(errors, "terminal.font_size", t.font_size.into(), 8, 32);
    if t.scrollback > 100_000 {
        errors.push(format!(
            "terminal.scrollback = {} exceeds the maximum of 100000",
            t.scrollback
        ));
    }
    if t.font_family.trim().is_empty() {
        errors.push("terminal.font_family must not be empty".into());
    }
}
