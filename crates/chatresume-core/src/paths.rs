//! Path resolution — data directory, config location, and the state file.

use std::path::{Path, PathBuf};

use crate::session::store::STATE_FILENAME;

/// Env var that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "CHATRESUME_CONFIG";

/// Get the Chatresume data directory (e.g. `~/.chatresume/`).
pub fn get_data_path() -> PathBuf {
    let home = home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".chatresume")
}

/// Config file path: `$CHATRESUME_CONFIG` if set, else `~/.chatresume/config.toml`.
pub fn get_config_path() -> PathBuf {
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(val) if !val.trim().is_empty() => expand_home(val.trim()),
        _ => get_data_path().join("config.toml"),
    }
}

/// State file living next to the config file.
///
/// Only the file name is swapped; the directory of `config_path` is kept.
pub fn resolve_sessions_path(config_path: &Path) -> PathBuf {
    config_path.with_file_name(STATE_FILENAME)
}

/// Expand `~` to the home directory in a path string.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("."));
    }
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().unwrap_or_else(|| PathBuf::from(".")).join(rest),
        None => PathBuf::from(path),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}
