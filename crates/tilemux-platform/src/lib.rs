//! Platform integration: per-OS locations for config and session state.

pub mod paths;

pub use paths::{config_dir, config_file, data_dir, ensure_dirs, session_file};
