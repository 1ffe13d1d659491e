use std::path::{Path, PathBuf};

use crate::constants::storage::{APP_DIR, CATALOG_FILE, DATABASE_FILE};

fn app_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
}

fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join(APP_DIR)
}

/// Returns the platform-specific path for the config file.
///
/// # Notes
/// - Uses platform-specific config directory (e.g., ~/.config on Linux)
/// - Falls back to current directory if config directory is unavailable
pub fn get_config_path() -> String {
    app_config_dir()
        .join("config.toml")
        .to_string_lossy()
        .to_string()
}

/// Returns the platform-specific path for the log directory.
pub fn get_log_dir_path() -> String {
    app_config_dir()
        .join("logs")
        .to_string_lossy()
        .to_string()
}

/// Default location of the executions database (e.g. ~/.local/share/tabellone on Linux)
pub fn get_database_path() -> String {
    app_data_dir()
        .join(DATABASE_FILE)
        .to_string_lossy()
        .to_string()
}

/// Default location of the category catalog, next to the config file
pub fn get_catalog_path() -> String {
    app_config_dir()
        .join(CATALOG_FILE)
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_live_under_app_dir() {
        for path in [
            get_config_path(),
            get_log_dir_path(),
            get_database_path(),
            get_catalog_path(),
        ] {
            assert!(path.contains(APP_DIR), "{path} should be under {APP_DIR}");
        }
        assert!(get_config_path().ends_with("config.toml"));
        assert!(get_database_path().ends_with(DATABASE_FILE));
    }
}
