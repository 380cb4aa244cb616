//! Session persistence validation.

use super::helpers::validate_range;
use crate::schema::TilemuxConfig;

pub(super) fn validate_session(errors: &mut Vec<String>, config: &TilemuxConfig) {
    validate_range(
        errors,
        "session.autosave_interval_secs",
        config.session.autosave_interval_secs,
        1,
        3600,
    );
}
