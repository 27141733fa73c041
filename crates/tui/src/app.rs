//! Application state for the cross menu front-end.
//!
//! `App` ties the menu content, the shared [`Navigator`], the tweened
//! motion state, and transient UI state (hover, reader overlay, swipe in
//! progress) together. Components read and mutate it; anything that has to
//! run asynchronously is returned as an [`Effect`] for the runtime.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};
use xmb_engine::{MoveOutcome, Navigator, NavigatorSettings};
use xmb_types::Direction;
use xmb_util::{BlogPost, CompactMode, XmbConfig, load_posts};

use crate::model::MenuModel;
use crate::port::{AnimationPort, TransitionRequest};
use crate::ui::components::reader::ReaderState;
use crate::ui::gesture::SwipeTracker;
use crate::ui::layout::LayoutProfile;
use crate::ui::motion::Motion;
use crate::ui::pulse;
use crate::ui::theme::{self, Theme};

/// Messages delivered to the application by the runtime.
#[derive(Debug)]
pub enum Msg {
    Tick,
    Resize(u16, u16),
    /// The navigator accepted a move and wants it animated.
    Transition(TransitionRequest),
    MoveFinished(MoveOutcome),
}

/// Side effects requested by components and executed by the runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Move(Direction),
    JumpMenu(usize),
    JumpSub { menu_index: usize, sub_index: usize },
    ReloadPosts,
    Quit,
}

/// Clickable region recorded while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    MenuItem(usize),
    SubItem { menu_index: usize, sub_index: usize },
}

pub struct App {
    pub model: MenuModel,
    pub navigator: Arc<Navigator<AnimationPort>>,
    pub motion: Motion,
    pub theme: Box<dyn Theme>,
    pub compact: CompactMode,
    pub reader: Option<ReaderState>,
    pub hover: Option<HitTarget>,
    /// Hit areas of the last rendered frame, topmost last.
    pub hit_areas: Vec<(Rect, HitTarget)>,
    pub swipe: SwipeTracker,
    /// Short message shown in the hint bar.
    pub status: Option<String>,
    blog_dir: Option<PathBuf>,
    started: Instant,
}

impl App {
    /// Builds the app for a terminal of `width` columns.
    ///
    /// Returns the receiving end of the animation port; the runtime feeds
    /// its requests back in as [`Msg::Transition`].
    pub fn new(config: &XmbConfig, posts: Vec<BlogPost>, width: u16) -> Result<(Self, UnboundedReceiver<TransitionRequest>)> {
        let mut model = MenuModel::from_config(config);
        model.apply_posts(posts);

        let (port, requests) = AnimationPort::channel();
        let settings = NavigatorSettings {
            completion_timeout: Some(config.transitions.timeout()),
        };
        let collection = model.collection().context("menu configuration has no items")?;
        let navigator = Arc::new(Navigator::with_settings(collection, port, settings));

        let profile = LayoutProfile::select(config.compact, width);
        let motion = Motion::new(
            profile,
            config.transitions.horizontal(),
            config.transitions.vertical(),
            &navigator.snapshot(),
        );
        info!(items = model.len(), posts = model.posts.len(), compact = profile.is_compact(), "cross menu ready");

        let app = Self {
            model,
            navigator,
            motion,
            theme: theme::load(config.theme.as_deref()),
            compact: config.compact,
            reader: None,
            hover: None,
            hit_areas: Vec::new(),
            swipe: SwipeTracker::default(),
            status: None,
            blog_dir: config.blog_dir.clone(),
            started: Instant::now(),
        };
        Ok((app, requests))
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::Tick => {
                self.motion.tick(Instant::now());
            }
            Msg::Resize(width, _) => {
                let profile = LayoutProfile::select(self.compact, width);
                if profile != self.motion.profile() {
                    debug!(compact = profile.is_compact(), "layout profile changed");
                    self.motion.relayout(profile, &self.navigator.snapshot());
                }
            }
            Msg::Transition(request) => self.motion.begin(request, Instant::now()),
            Msg::MoveFinished(outcome) => match outcome {
                MoveOutcome::Completed => {}
                MoveOutcome::Rejected(reason) => debug!(%reason, "move ignored"),
                MoveOutcome::TimedOut | MoveOutcome::Abandoned => {
                    warn!(?outcome, "transition did not finish cleanly");
                }
            },
        }
        Vec::new()
    }

    /// Whether the runtime should tick at animation speed.
    pub fn is_animating(&self) -> bool {
        self.motion.is_animating() || pulse::any_pulse_active(self.started.elapsed(), self.model.len())
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<HitTarget> {
        self.hit_areas
            .iter()
            .rev()
            .find(|(area, _)| area.contains((column, row).into()))
            .map(|(_, target)| *target)
    }

    /// Opens the blog post behind the active sub-item, if there is one.
    pub fn open_reader(&mut self) -> bool {
        let menu_index = self.navigator.active_menu_index();
        let Some(sub_index) = self.navigator.active_sub_index(menu_index) else {
            return false;
        };
        match self.model.post_for(menu_index, sub_index) {
            Some(post) => {
                debug!(post = %post.filename, "opening reader");
                self.reader = Some(ReaderState::new(post.clone()));
                true
            }
            None => false,
        }
    }

    pub fn close_reader(&mut self) {
        self.reader = None;
    }

    /// Re-reads the blog directory and re-initialises the navigator.
    ///
    /// The model is only swapped in once the navigator accepted the reload,
    /// so a refused reload leaves everything as it was.
    pub fn reload_posts(&mut self) -> Result<usize> {
        let Some(dir) = self.blog_dir.clone() else {
            return Ok(0);
        };
        let posts = match load_posts(&dir) {
            Ok(posts) => posts,
            Err(error) => {
                warn!(%error, "blog directory unavailable; keeping static entries");
                Vec::new()
            }
        };
        let count = posts.len();

        let mut model = self.model.clone();
        model.apply_posts(posts);
        let collection = model.collection().context("menu has no items")?;
        self.navigator.reload(collection).context("navigator refused to reload")?;

        self.model = model;
        self.reader = None;
        self.hover = None;
        self.motion.relayout(self.motion.profile(), &self.navigator.snapshot());
        Ok(count)
    }
}
