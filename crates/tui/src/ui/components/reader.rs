//! Blog post reader overlay.
//!
//! Posts are markdown, but only a handful of forms get special treatment:
//! headings, list bullets, block quotes and fenced code at block level, and
//! `**bold**`, `*italic*` and `` `code` `` inline. Prose is wrapped to the
//! overlay width with `textwrap`; code blocks are never wrapped.

use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;
use xmb_util::BlogPost;

use crate::app::{App, Effect};
use crate::ui::components::component::Component;
use crate::ui::theme::{Theme, theme_helpers as th};
use crate::ui::utils::centered_rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Heading,
    Bullet,
    Quote,
    Code,
    Text,
    Blank,
}

/// Inline emphasis of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Plain,
    Bold,
    Italic,
    Code,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub kind: LineKind,
    pub spans: Vec<(Emphasis, String)>,
}

impl StyledLine {
    fn plain(kind: LineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            spans: vec![(Emphasis::Plain, text.into())],
        }
    }

    /// The line's text without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|(_, text)| text.as_str()).collect()
    }
}

/// Classify and wrap `content` for a `width`-column viewport.
pub fn markdown_lines(content: &str, width: usize) -> Vec<StyledLine> {
    let width = width.max(8);
    let mut lines = Vec::new();
    let mut in_code = false;

    for raw in content.lines() {
        let trimmed = raw.trim_start();
        if trimmed.starts_with("```") {
            in_code = !in_code;
            continue;
        }
        if in_code {
            lines.push(StyledLine::plain(LineKind::Code, raw));
            continue;
        }
        if trimmed.is_empty() {
            lines.push(StyledLine::plain(LineKind::Blank, ""));
            continue;
        }

        if let Some(heading) = heading_text(trimmed) {
            push_wrapped(&mut lines, LineKind::Heading, heading, textwrap::Options::new(width));
        } else if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
            let options = textwrap::Options::new(width).initial_indent("• ").subsequent_indent("  ");
            push_wrapped(&mut lines, LineKind::Bullet, item, options);
        } else if let Some(quote) = trimmed.strip_prefix('>') {
            let options = textwrap::Options::new(width).initial_indent("│ ").subsequent_indent("│ ");
            push_wrapped(&mut lines, LineKind::Quote, quote.trim_start(), options);
        } else {
            push_wrapped(&mut lines, LineKind::Text, trimmed, textwrap::Options::new(width));
        }
    }
    lines
}

fn heading_text(line: &str) -> Option<&str> {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    line[level..].strip_prefix(' ').map(str::trim)
}

/// Split `text` into emphasis runs, dropping the markers.
///
/// Markers without a closing partner are kept as literal text.
pub fn parse_inline(text: &str) -> Vec<(Emphasis, String)> {
    let mut runs: Vec<(Emphasis, String)> = Vec::new();
    let mut rest = text;
    while let Some(first) = rest.chars().next() {
        let delimited = [("**", Emphasis::Bold), ("`", Emphasis::Code), ("*", Emphasis::Italic)]
            .into_iter()
            .find_map(|(marker, emphasis)| {
                let body = rest.strip_prefix(marker)?;
                let close = body.find(marker).filter(|close| *close > 0)?;
                Some((emphasis, &body[..close], &body[close + marker.len()..]))
            });
        match delimited {
            Some((emphasis, inner, after)) => {
                push_run(&mut runs, emphasis, inner);
                rest = after;
            }
            None => {
                push_run(&mut runs, Emphasis::Plain, &rest[..first.len_utf8()]);
                rest = &rest[first.len_utf8()..];
            }
        }
    }
    runs
}

fn push_run(runs: &mut Vec<(Emphasis, String)>, emphasis: Emphasis, text: &str) {
    match runs.last_mut() {
        Some((last, buffer)) if *last == emphasis => buffer.push_str(text),
        _ => runs.push((emphasis, text.to_string())),
    }
}

/// Wrap the marker-free text, then lay the emphasis runs back over each line.
///
/// Wrapping only drops whitespace at break points and adds the indents, so
/// walking both texts in step recovers every character's emphasis.
fn push_wrapped(lines: &mut Vec<StyledLine>, kind: LineKind, text: &str, options: textwrap::Options<'_>) {
    let styled: Vec<(char, Emphasis)> = parse_inline(text)
        .into_iter()
        .flat_map(|(emphasis, run)| run.chars().map(move |c| (c, emphasis)).collect::<Vec<_>>())
        .collect();
    let plain: String = styled.iter().map(|(c, _)| *c).collect();
    let initial_indent = options.initial_indent;
    let subsequent_indent = options.subsequent_indent;

    let mut cursor = 0;
    for (index, wrapped) in textwrap::wrap(&plain, options).into_iter().enumerate() {
        let indent = if index == 0 { initial_indent } else { subsequent_indent };
        let body = wrapped.strip_prefix(indent).unwrap_or(&wrapped);

        let mut runs = Vec::new();
        if !indent.is_empty() && body.len() < wrapped.len() {
            push_run(&mut runs, Emphasis::Plain, indent);
        }
        for c in body.chars() {
            while styled.get(cursor).is_some_and(|(expected, _)| *expected != c) {
                cursor += 1;
            }
            let emphasis = styled.get(cursor).map_or(Emphasis::Plain, |(_, emphasis)| *emphasis);
            push_run(&mut runs, emphasis, c.encode_utf8(&mut [0; 4]));
            cursor += 1;
        }
        lines.push(StyledLine { kind, spans: runs });
    }
}

/// Open post plus scroll position.
#[derive(Debug, Clone)]
pub struct ReaderState {
    post: BlogPost,
    scroll: u16,
    viewport: u16,
    total_lines: u16,
}

impl ReaderState {
    pub fn new(post: BlogPost) -> Self {
        Self {
            post,
            scroll: 0,
            viewport: 0,
            total_lines: 0,
        }
    }

    pub fn post(&self) -> &BlogPost {
        &self.post
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn max_scroll(&self) -> u16 {
        self.total_lines.saturating_sub(self.viewport)
    }

    /// Record the rendered size and re-clamp the scroll position.
    pub fn set_bounds(&mut self, total_lines: usize, viewport: u16) {
        self.total_lines = u16::try_from(total_lines).unwrap_or(u16::MAX);
        self.viewport = viewport;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = (i32::from(self.scroll) + delta).clamp(0, i32::from(self.max_scroll()));
        self.scroll = next as u16;
    }

    pub fn page(&self) -> i32 {
        i32::from(self.viewport.saturating_sub(1).max(1))
    }
}

fn line_style(theme: &dyn Theme, kind: LineKind) -> Style {
    match kind {
        LineKind::Heading => theme.heading_style(),
        LineKind::Bullet | LineKind::Text | LineKind::Blank => theme.text_primary_style(),
        LineKind::Quote => theme.text_secondary_style().add_modifier(Modifier::ITALIC),
        LineKind::Code => theme.code_style(),
    }
}

fn emphasis_style(theme: &dyn Theme, base: Style, emphasis: Emphasis) -> Style {
    match emphasis {
        Emphasis::Plain => base,
        Emphasis::Bold => base.add_modifier(Modifier::BOLD),
        Emphasis::Italic => base.add_modifier(Modifier::ITALIC),
        Emphasis::Code => theme.code_style(),
    }
}

#[derive(Debug, Default)]
pub struct ReaderComponent;

impl Component for ReaderComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let Some(reader) = app.reader.as_mut() else {
            return Vec::new();
        };
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Backspace => app.close_reader(),
            KeyCode::Up | KeyCode::Char('k') => reader.scroll_by(-1),
            KeyCode::Down | KeyCode::Char('j') => reader.scroll_by(1),
            KeyCode::PageUp => reader.scroll_by(-reader.page()),
            KeyCode::PageDown | KeyCode::Char(' ') => reader.scroll_by(reader.page()),
            KeyCode::Home => reader.scroll_by(i32::MIN / 2),
            KeyCode::End => reader.scroll_by(i32::MAX / 2),
            _ => {}
        }
        Vec::new()
    }

    fn handle_mouse_events(&mut self, app: &mut App, mouse: MouseEvent) -> Vec<Effect> {
        if let Some(reader) = app.reader.as_mut() {
            match mouse.kind {
                MouseEventKind::ScrollUp => reader.scroll_by(-3),
                MouseEventKind::ScrollDown => reader.scroll_by(3),
                _ => {}
            }
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let theme = &*app.theme;
        let Some(reader) = app.reader.as_mut() else {
            return;
        };
        let area = centered_rect(80, 84, rect);
        frame.render_widget(Clear, area);

        let title = reader.post.title.clone();
        let block = th::block(theme, Some(title.as_str()), true);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [header, body] = Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(inner);
        let mut header_spans = vec![Span::styled(reader.post.display_date(), theme.text_secondary_style())];
        if !reader.post.excerpt.is_empty() {
            header_spans.push(Span::styled("  ", theme.text_muted_style()));
            header_spans.push(Span::styled(reader.post.excerpt.clone(), theme.text_muted_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(header_spans)), header);

        let lines = markdown_lines(&reader.post.content, usize::from(body.width));
        reader.set_bounds(lines.len(), body.height);
        let text: Vec<Line> = lines
            .into_iter()
            .map(|line| {
                let style = line_style(theme, line.kind);
                if line.kind == LineKind::Code {
                    let text = line.text();
                    let clipped = if text.width() > usize::from(body.width) {
                        truncate_to_width(&text, usize::from(body.width))
                    } else {
                        text
                    };
                    return Line::from(Span::styled(clipped, style));
                }
                let spans: Vec<Span> = line
                    .spans
                    .into_iter()
                    .map(|(emphasis, text)| Span::styled(text, emphasis_style(theme, style, emphasis)))
                    .collect();
                Line::from(spans)
            })
            .collect();
        frame.render_widget(Paragraph::new(text).scroll((reader.scroll, 0)), body);
    }
}

fn truncate_to_width(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|c| {
            used += unicode_width::UnicodeWidthChar::width(*c).unwrap_or(0);
            used <= width
        })
        .collect()
}
