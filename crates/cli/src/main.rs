//! `xmb`: a PlayStation-style cross menu portfolio in the terminal.
//!
//! ```bash
//! # open the menu with the default config and ./blog
//! xmb
//!
//! # use another config file and post directory
//! xmb --config ~/portfolio.yaml --blog-dir ~/notes
//!
//! # list the posts the menu would show
//! xmb posts --json
//! ```

use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;
use xmb_util::{BlogPost, CompactMode, XmbConfig, default_log_path, expand_tilde_path, load_posts};

#[derive(Debug, Parser)]
#[command(name = "xmb", version, about = "Cross menu portfolio for the terminal")]
struct Cli {
    /// Config file (defaults to $XMB_CONFIG_PATH or <config dir>/xmb/config.yaml)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Directory of markdown posts; overrides `blog_dir` from the config
    #[arg(long, global = true)]
    blog_dir: Option<PathBuf>,

    /// Layout density; overrides `compact` from the config
    #[arg(long, value_enum, global = true)]
    compact: Option<CompactArg>,

    /// Theme name (xmb, xmb-hc, ansi256); overrides `theme` from the config
    #[arg(long, global = true)]
    theme: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the blog posts the menu would show, newest first
    Posts {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CompactArg {
    Auto,
    Always,
    Never,
}

impl From<CompactArg> for CompactMode {
    fn from(value: CompactArg) -> Self {
        match value {
            CompactArg::Auto => CompactMode::Auto,
            CompactArg::Always => CompactMode::Always,
            CompactArg::Never => CompactMode::Never,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Posts { json }) => {
            init_tracing(LogTarget::Stderr)?;
            let config = load_config(&cli)?;
            print_posts(&read_posts(&config), json)
        }
        None => {
            init_tracing(LogTarget::File)?;
            let config = load_config(&cli)?;
            let posts = read_posts(&config);
            xmb_tui::run(config, posts).await
        }
    }
}

enum LogTarget {
    Stderr,
    /// The TUI owns the terminal, so logs go to `$XMB_LOG_PATH` or the data dir.
    File,
}

fn init_tracing(target: LogTarget) -> Result<()> {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::new(filter));
    let _ = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::File => {
            let path = default_log_path();
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    };
    Ok(())
}

/// Config file plus command-line overrides.
fn load_config(cli: &Cli) -> Result<XmbConfig> {
    let (mut config, source) = XmbConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    match source {
        Some(path) => info!(path = %path.display(), "using config file"),
        None => info!("using built-in menu"),
    }
    if let Some(dir) = cli.blog_dir.as_deref() {
        config.blog_dir = Some(expand_tilde_path(dir));
    }
    if let Some(compact) = cli.compact {
        config.compact = compact.into();
    }
    if let Some(theme) = cli.theme.as_ref() {
        config.theme = Some(theme.clone());
    }
    Ok(config)
}

/// Posts for the blog item; an unreadable directory leaves the static entries.
fn read_posts(config: &XmbConfig) -> Vec<BlogPost> {
    let Some(dir) = config.blog_dir.as_deref() else {
        return Vec::new();
    };
    match load_posts(dir) {
        Ok(posts) => posts,
        Err(error) => {
            warn!(%error, "blog posts unavailable; using static entries");
            Vec::new()
        }
    }
}

fn print_posts(posts: &[BlogPost], json: bool) -> Result<()> {
    if json {
        let listing: Vec<_> = posts
            .iter()
            .map(|post| {
                serde_json::json!({
                    "filename": post.filename,
                    "title": post.title,
                    "date": post.date,
                    "excerpt": post.excerpt,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("No posts found");
        return Ok(());
    }
    for line in post_table(posts) {
        println!("{line}");
    }
    Ok(())
}

fn post_table(posts: &[BlogPost]) -> Vec<String> {
    let date_width = posts.iter().map(|post| post.date.width()).max().unwrap_or(0).max(4);
    let title_width = posts.iter().map(|post| post.title.width()).max().unwrap_or(0).max(5);
    let mut lines = vec![format!("{} {}  EXCERPT", pad("DATE", date_width), pad("TITLE", title_width))];
    lines.extend(
        posts
            .iter()
            .map(|post| format!("{} {}  {}", pad(&post.date, date_width), pad(&post.title, title_width), post.excerpt).trim_end().to_string()),
    );
    lines
}

/// Left-align `text` in `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn parses_overrides_and_subcommand() {
        let cli = Cli::try_parse_from(["xmb", "--compact", "always", "--theme", "ansi256", "posts", "--json"]).expect("parse");
        assert_eq!(cli.compact, Some(CompactArg::Always));
        assert_eq!(cli.theme.as_deref(), Some("ansi256"));
        assert!(matches!(cli.command, Some(Command::Posts { json: true })));

        let cli = Cli::try_parse_from(["xmb", "posts", "--blog-dir", "notes"]).expect("parse");
        assert_eq!(cli.blog_dir.as_deref(), Some(Path::new("notes")));
        assert!(Cli::try_parse_from(["xmb", "--compact", "tiny"]).is_err());

        let cli = Cli::try_parse_from(["xmb", "posts", "--theme", "xmb-hc", "--compact", "never", "-c", "alt.yaml"]).expect("parse");
        assert_eq!(cli.theme.as_deref(), Some("xmb-hc"));
        assert_eq!(cli.compact, Some(CompactArg::Never));
        assert_eq!(cli.config.as_deref(), Some(Path::new("alt.yaml")));
    }

    #[test]
    fn table_aligns_columns() {
        let posts = vec![
            BlogPost::from_markdown("a.md", "---\ntitle: Welcome\ndate: 2024-03-05\nexcerpt: hi\n---\n"),
            BlogPost::from_markdown("b.md", "---\ntitle: Él\ndate: 2024-01-15\n---\n"),
        ];
        let lines = post_table(&posts);
        assert_eq!(lines[0], "DATE       TITLE    EXCERPT");
        assert_eq!(lines[1], "2024-03-05 Welcome  hi");
        assert_eq!(lines[2], "2024-01-15 Él");
    }

    #[test]
    fn missing_blog_dir_yields_no_posts() {
        let mut config = XmbConfig::default();
        config.blog_dir = Some(PathBuf::from("/definitely/not/here"));
        assert!(read_posts(&config).is_empty());
        config.blog_dir = None;
        assert!(read_posts(&config).is_empty());
    }
}
