use std::env;
use std::path::{Path, PathBuf};

use dirs_next::{config_dir, data_dir, home_dir};

/// Directory name used under the platform config/data roots.
pub const APP_DIR_NAME: &str = "xmb";
/// Environment variable overriding where the TUI writes its log file.
pub const LOG_PATH_ENV: &str = "XMB_LOG_PATH";

pub fn expand_tilde(path: &str) -> PathBuf {
    let p = path.trim();
    if p == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from("~"));
    }
    if let Some(rest) = p.strip_prefix("~/") {
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    if let Some(rest) = p.strip_prefix("~\\") {
        // Windows-style
        return home_dir().unwrap_or_else(|| PathBuf::from("~")).join(rest);
    }
    PathBuf::from(p)
}

/// Tilde-expands a path that came from config or the command line.
pub fn expand_tilde_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(text) if text.trim_start().starts_with('~') => expand_tilde(text),
        _ => path.to_path_buf(),
    }
}

/// `<config dir>/xmb`, or `./xmb` when the platform has no config dir.
pub fn app_config_dir() -> PathBuf {
    config_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

/// Log file location: `XMB_LOG_PATH` when set, else `<data dir>/xmb/xmb.log`.
pub fn default_log_path() -> PathBuf {
    if let Ok(path) = env::var(LOG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("xmb.log")
}
