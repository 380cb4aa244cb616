mod ensure;
mod resolve;

pub use ensure::ensure_dirs;
pub use resolve::{config_dir, config_file, data_dir, session_file};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_dir_ends_with_tilemux() {
        let path = config_dir().unwrap();
        assert!(
            path.ends_with("tilemux"),
            "config_dir should end with 'tilemux', got: {path:?}"
        );
    }

    #[test]
    fn data_dir_ends_with_tilemux() {
        let path = data_dir().unwrap();
        assert!(path.ends_with("tilemux"), "got: {path:?}");
    }

    #[test]
    fn config_file_has_correct_name() {
        let path = config_file().unwrap();
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), "config.toml");
        assert!(path.parent().unwrap().ends_with("tilemux"));
    }

    #[test]
    fn session_file_lives_in_data_dir() {
        let session = session_file().unwrap();
        let data = data_dir().unwrap();
        assert!(session.starts_with(&data));
        assert_eq!(session.file_name().unwrap().to_str().unwrap(), "session.json");
    }

    #[test]
    fn managed_dirs_are_config_and_data_only() {
        let dirs = ensure::managed_dirs().unwrap();
        assert_eq!(dirs, vec![config_dir().unwrap(), data_dir().unwrap()]);
    }
}
