//! YAML configuration for the cross menu.
//!
//! The file describes the top-level menu (icons, labels, static sub-items),
//! where blog posts live, the theme, and transition timings. Resolution
//! order: explicit path, then `XMB_CONFIG_PATH`, then
//! `<config dir>/xmb/config.yaml`. A missing default file is not an error;
//! the built-in portfolio menu is used instead.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::path_processing::{app_config_dir, expand_tilde, expand_tilde_path};

/// Environment variable allowing callers to override the config file path.
pub const CONFIG_PATH_ENV: &str = "XMB_CONFIG_PATH";

/// Default filename inside the app config directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Error surfaced when reading or validating configuration fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// When the compact layout profile is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompactMode {
    /// Compact below 80 terminal columns.
    #[default]
    Auto,
    Always,
    Never,
}

/// A static entry of a sub-menu column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItemConfig {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SubItemConfig {
    pub fn new(title: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            title: title.into(),
            description: description.map(str::to_string),
        }
    }
}

/// One top-level menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemConfig {
    pub icon: String,
    pub label: String,
    /// `None` means the item has no sub-menu at all.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_items: Option<Vec<SubItemConfig>>,
    /// Whether blog posts replace this item's sub-items once loaded.
    #[serde(default)]
    pub blog: bool,
}

/// Transition durations in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionConfig {
    pub horizontal_ms: u64,
    pub vertical_ms: u64,
    /// Deadline after which a stuck transition releases its axis.
    pub timeout_ms: u64,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            horizontal_ms: 300,
            vertical_ms: 250,
            timeout_ms: 2000,
        }
    }
}

impl TransitionConfig {
    pub fn horizontal(&self) -> Duration {
        Duration::from_millis(self.horizontal_ms)
    }

    pub fn vertical(&self) -> Duration {
        Duration::from_millis(self.vertical_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Complete configuration payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmbConfig {
    pub menu: Vec<MenuItemConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    pub compact: CompactMode,
    pub transitions: TransitionConfig,
}

impl Default for XmbConfig {
    fn default() -> Self {
        Self {
            menu: default_menu(),
            blog_dir: Some(PathBuf::from("blog")),
            theme: None,
            compact: CompactMode::default(),
            transitions: TransitionConfig::default(),
        }
    }
}

impl XmbConfig {
    /// Loads configuration, returning it along with the file it came from.
    ///
    /// An explicit path must exist. The environment/default path may be
    /// absent, in which case defaults are returned with no source path.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            let path = expand_tilde_path(path);
            return Self::from_file(&path).map(|config| (config, Some(path)));
        }

        let path = default_config_path();
        if !path.exists() {
            debug!(path = %path.display(), "no config file found; using defaults");
            return Ok((Self::default(), None));
        }
        Self::from_file(&path).map(|config| (config, Some(path)))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!(path = %path.display(), items = config.menu.len(), "loaded config");
        Ok(config.with_expanded_paths())
    }

    /// Parses and validates YAML text without touching the filesystem.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config.with_expanded_paths())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.menu.is_empty() {
            return Err(ConfigError::Invalid("menu needs at least one item".into()));
        }
        let blog_items = self.menu.iter().filter(|item| item.blog).count();
        if blog_items > 1 {
            return Err(ConfigError::Invalid(format!("only one menu item may be the blog, found {blog_items}")));
        }
        let TransitionConfig {
            horizontal_ms,
            vertical_ms,
            timeout_ms,
        } = self.transitions;
        if horizontal_ms == 0 || vertical_ms == 0 || timeout_ms == 0 {
            return Err(ConfigError::Invalid("transition durations must be greater than zero".into()));
        }
        let longest = horizontal_ms.max(vertical_ms);
        if timeout_ms <= longest {
            return Err(ConfigError::Invalid(format!(
                "transitions.timeout_ms ({timeout_ms}) must be longer than the longest transition ({longest})"
            )));
        }
        Ok(())
    }

    /// Index of the menu item that hosts blog posts, if any.
    pub fn blog_item_index(&self) -> Option<usize> {
        self.menu.iter().position(|item| item.blog)
    }

    fn with_expanded_paths(mut self) -> Self {
        self.blog_dir = self.blog_dir.map(|dir| expand_tilde_path(&dir));
        self
    }
}

fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return expand_tilde(trimmed);
        }
    }
    app_config_dir().join(CONFIG_FILE_NAME)
}

fn default_menu() -> Vec<MenuItemConfig> {
    vec![
        MenuItemConfig {
            icon: "☺".into(),
            label: "About".into(),
            sub_items: Some(vec![
                SubItemConfig::new("Bio", Some("Who I am and what I build")),
                SubItemConfig::new("Skills", Some("Languages, tools and platforms")),
                SubItemConfig::new("Experience", Some("Where I have worked")),
            ]),
            blog: false,
        },
        MenuItemConfig {
            icon: "▣".into(),
            label: "Projects".into(),
            sub_items: Some(vec![
                SubItemConfig::new("Cross Menu", Some("This portfolio")),
                SubItemConfig::new("Open Source", Some("Contributions and side projects")),
            ]),
            blog: false,
        },
        MenuItemConfig {
            icon: "✎".into(),
            label: "Log".into(),
            sub_items: Some(vec![SubItemConfig::new("No posts yet", Some("Posts appear here once written"))]),
            blog: true,
        },
        MenuItemConfig {
            icon: "✉".into(),
            label: "Contact".into(),
            sub_items: None,
            blog: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_valid() {
        let config = XmbConfig::default();
        config.validate().expect("default config validates");
        assert_eq!(config.blog_item_index(), Some(2));
        assert!(config.menu[3].sub_items.is_none());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = XmbConfig::from_yaml_str(
            r##"
menu:
  - icon: "*"
    label: Home
  - icon: "#"
    label: Notes
    blog: true
    sub_items:
      - title: Draft
transitions:
  vertical_ms: 100
"##,
        )
        .expect("parse");
        assert_eq!(config.menu.len(), 2);
        assert_eq!(config.menu[0].sub_items, None);
        assert_eq!(config.blog_item_index(), Some(1));
        assert_eq!(config.transitions.vertical_ms, 100);
        assert_eq!(config.transitions.horizontal_ms, 300);
        assert_eq!(config.compact, CompactMode::Auto);
    }

    #[test]
    fn rejects_two_blog_items_and_zero_durations() {
        let two_blogs = "menu:\n  - {icon: a, label: A, blog: true}\n  - {icon: b, label: B, blog: true}\n";
        assert!(matches!(XmbConfig::from_yaml_str(two_blogs), Err(ConfigError::Invalid(_))));

        let zero = "transitions:\n  timeout_ms: 0\n";
        assert!(matches!(XmbConfig::from_yaml_str(zero), Err(ConfigError::Invalid(_))));

        assert!(matches!(XmbConfig::from_yaml_str("menu: []\n"), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn timeout_must_outlast_every_transition() {
        let short = "transitions:\n  horizontal_ms: 5000\n  timeout_ms: 100\n";
        assert!(matches!(XmbConfig::from_yaml_str(short), Err(ConfigError::Invalid(_))));

        let equal = "transitions:\n  vertical_ms: 2000\n  timeout_ms: 2000\n";
        assert!(matches!(XmbConfig::from_yaml_str(equal), Err(ConfigError::Invalid(_))));

        let config = XmbConfig::from_yaml_str("transitions:\n  horizontal_ms: 1500\n  timeout_ms: 1600\n").expect("parse");
        assert_eq!(config.transitions.timeout(), Duration::from_millis(1600));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.yaml");
        assert!(matches!(XmbConfig::load(Some(&missing)), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn env_path_is_used_and_missing_default_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "theme: ansi256\ncompact: always\n").unwrap();

        temp_env::with_var(CONFIG_PATH_ENV, Some(path.to_str().unwrap()), || {
            let (config, source) = XmbConfig::load(None).expect("load");
            assert_eq!(source.as_deref(), Some(path.as_path()));
            assert_eq!(config.theme.as_deref(), Some("ansi256"));
            assert_eq!(config.compact, CompactMode::Always);
            assert_eq!(config.menu.len(), 4);
        });

        let absent = dir.path().join("absent.yaml");
        temp_env::with_var(CONFIG_PATH_ENV, Some(absent.to_str().unwrap()), || {
            let (config, source) = XmbConfig::load(None).expect("load");
            assert!(source.is_none());
            assert_eq!(config, XmbConfig::default());
        });
    }

    #[test]
    fn malformed_yaml_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "menu: [").unwrap();
        let error = XmbConfig::from_file(&path).unwrap_err();
        assert!(error.to_string().contains("config.yaml"));
    }
}
