//! Markdown blog posts with a YAML frontmatter header.
//!
//! Every `*.md` file in the blog directory becomes a [`BlogPost`]. A post
//! starts with an optional frontmatter block:
//!
//! ```text
//! ---
//! title: "Welcome"
//! date: 2024-01-15
//! excerpt: First post
//! ---
//! # Body in markdown
//! ```
//!
//! Missing keys fall back to defaults, files that cannot be read are skipped
//! with a warning, and posts are ordered newest first.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const DEFAULT_TITLE: &str = "Untitled Post";
pub const DEFAULT_DATE: &str = "2024-01-01";

static FRONTMATTER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\A---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n(.*))?\z").expect("frontmatter regex should compile"));

#[derive(Debug, Error)]
pub enum PostError {
    #[error("failed to read blog directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read post {path}: {source}")]
    ReadPost {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A loaded blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPost {
    pub filename: String,
    pub title: String,
    /// Date exactly as written in the frontmatter.
    pub date: String,
    pub excerpt: String,
    /// Markdown body without the frontmatter block.
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    title: Option<String>,
    date: Option<String>,
    excerpt: Option<String>,
}

impl Frontmatter {
    fn parse(header: &str) -> Self {
        match serde_yaml::from_str::<Option<Frontmatter>>(header) {
            Ok(parsed) => parsed.unwrap_or_default(),
            Err(error) => {
                debug!(%error, "frontmatter is not strict YAML; reading key/value lines");
                Self::from_lines(header)
            }
        }
    }

    /// Lenient `key: value` reader for headers YAML rejects.
    fn from_lines(header: &str) -> Self {
        let mut fields: HashMap<&str, String> = HashMap::new();
        for line in header.lines() {
            if let Some((key, value)) = line.split_once(':') {
                let key = key.trim();
                if key.is_empty() {
                    continue;
                }
                fields.insert(key, unquote(value.trim()).to_string());
            }
        }
        Self {
            title: fields.remove("title"),
            date: fields.remove("date"),
            excerpt: fields.remove("excerpt"),
        }
    }
}

fn unquote(value: &str) -> &str {
    let value = value.strip_prefix(['"', '\'']).unwrap_or(value);
    value.strip_suffix(['"', '\'']).unwrap_or(value)
}

impl BlogPost {
    /// Builds a post from a file's name and raw markdown text.
    pub fn from_markdown(filename: impl Into<String>, text: &str) -> Self {
        let (frontmatter, body) = match FRONTMATTER.captures(text) {
            Some(captures) => {
                let header = captures.get(1).map_or("", |m| m.as_str());
                let body = captures.get(2).map_or("", |m| m.as_str());
                (Frontmatter::parse(header), body)
            }
            None => (Frontmatter::default(), text),
        };

        Self {
            filename: filename.into(),
            title: non_empty(frontmatter.title).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            date: non_empty(frontmatter.date).unwrap_or_else(|| DEFAULT_DATE.to_string()),
            excerpt: frontmatter.excerpt.unwrap_or_default(),
            content: body.to_string(),
        }
    }

    /// The post date as a calendar date, when it is ISO formatted.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let head = self.date.get(..10).unwrap_or(&self.date);
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }

    /// Long-form date for display, e.g. `January 15, 2024`.
    ///
    /// Dates that do not parse are shown as written.
    pub fn display_date(&self) -> String {
        match self.parsed_date() {
            Some(date) => date.format("%B %-d, %Y").to_string(),
            None => self.date.clone(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Newest first; undated posts go last, ties break on filename.
fn newest_first(a: &BlogPost, b: &BlogPost) -> Ordering {
    match (a.parsed_date(), b.parsed_date()) {
        (Some(left), Some(right)) => right.cmp(&left),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.filename.cmp(&b.filename))
}

pub fn load_post(path: &Path) -> Result<BlogPost, PostError> {
    let text = fs::read_to_string(path).map_err(|source| PostError::ReadPost {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(BlogPost::from_markdown(filename, &text))
}

/// Loads every markdown post in `dir`, newest first.
///
/// Individual posts that fail to load are logged and skipped. Only an
/// unreadable directory is an error.
pub fn load_posts(dir: &Path) -> Result<Vec<BlogPost>, PostError> {
    let entries = fs::read_dir(dir).map_err(|source| PostError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut posts = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let is_markdown = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("md"));
        if !is_markdown || !path.is_file() {
            continue;
        }
        match load_post(&path) {
            Ok(post) => posts.push(post),
            Err(error) => warn!(%error, "skipping blog post"),
        }
    }

    posts.sort_by(newest_first);
    info!(dir = %dir.display(), count = posts.len(), "loaded blog posts");
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_frontmatter_and_body() {
        let post = BlogPost::from_markdown(
            "2024-01-15-welcome.md",
            "---\ntitle: \"Welcome\"\ndate: 2024-01-15\nexcerpt: 'Hello there'\n---\n# Hi\n\nBody text\n",
        );
        assert_eq!(post.title, "Welcome");
        assert_eq!(post.date, "2024-01-15");
        assert_eq!(post.excerpt, "Hello there");
        assert_eq!(post.content, "# Hi\n\nBody text\n");
        assert_eq!(post.parsed_date(), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(post.display_date(), "January 15, 2024");
    }

    #[test]
    fn display_date_keeps_unparsed_text() {
        let post = BlogPost::from_markdown("x.md", "---
date: someday
---
");
        assert_eq!(post.display_date(), "someday");
        let stamped = BlogPost::from_markdown("y.md", "---
date: 2023-12-05T10:30:00Z
---
");
        assert_eq!(stamped.display_date(), "December 5, 2023");
    }

    #[test]
    fn missing_frontmatter_keeps_whole_text_and_defaults() {
        let post = BlogPost::from_markdown("notes.md", "just text\n");
        assert_eq!(post.title, DEFAULT_TITLE);
        assert_eq!(post.date, DEFAULT_DATE);
        assert_eq!(post.excerpt, "");
        assert_eq!(post.content, "just text\n");
    }

    #[test]
    fn non_yaml_header_uses_line_reader() {
        let post = BlogPost::from_markdown("odd.md", "---\ntitle: Colons: everywhere\n: orphan\ndate: \"2023-05-01\"\n---\nbody");
        assert_eq!(post.title, "Colons: everywhere");
        assert_eq!(post.date, "2023-05-01");
        assert_eq!(post.content, "body");
    }

    #[test]
    fn empty_header_falls_back_to_defaults() {
        let post = BlogPost::from_markdown("empty.md", "---\n\n---\nbody\n");
        assert_eq!(post.title, DEFAULT_TITLE);
        assert_eq!(post.content, "body\n");
    }

    #[test]
    fn loads_markdown_files_newest_first() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.md"), "---\ntitle: Old\ndate: 2024-01-15\n---\nold").unwrap();
        fs::write(dir.path().join("b.md"), "---\ntitle: New\ndate: 2024-03-05\n---\nnew").unwrap();
        fs::write(dir.path().join("c.md"), "---\ntitle: Undated\ndate: someday\n---\n?").unwrap();
        fs::write(dir.path().join("readme.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("nested.md")).unwrap();

        let posts = load_posts(dir.path()).expect("load posts");
        let titles: Vec<_> = posts.iter().map(|post| post.title.as_str()).collect();
        assert_eq!(titles, vec!["New", "Old", "Undated"]);
    }

    #[test]
    fn unreadable_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(load_posts(&missing), Err(PostError::ReadDir { .. })));
    }
}
