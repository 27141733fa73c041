//! Configuration, content loading and path helpers for the XMB cross menu.

pub mod config;
pub mod path_processing;
pub mod posts;

pub use config::{CONFIG_PATH_ENV, CompactMode, ConfigError, MenuItemConfig, SubItemConfig, TransitionConfig, XmbConfig};
pub use path_processing::{LOG_PATH_ENV, app_config_dir, default_log_path, expand_tilde, expand_tilde_path};
pub use posts::{BlogPost, PostError, load_post, load_posts};
