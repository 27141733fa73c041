//! # XMB Terminal UI
//!
//! Terminal front-end for the cross menu: a row of top-level items, each
//! with a vertical column of sub-items, navigated with the keyboard, mouse
//! clicks, drag swipes, or the scroll wheel.
//!
//! ## Architecture
//!
//! - [`xmb_engine::Navigator`] owns the selection and serialises moves.
//! - [`port::AnimationPort`] hands every accepted move to the render loop
//!   together with one completion signal per animated element.
//! - The runtime tweens those elements and finishes each signal when its
//!   tween ends, which releases the move.
//! - Components (cross menu, reader overlay, hint bar) map input to effects
//!   and render from [`app::App`].

mod app;
mod model;
mod port;
mod ui;

use anyhow::Result;
use xmb_util::{BlogPost, XmbConfig};

/// Runs the cross menu until the user quits.
///
/// `posts` replace the sub-items of the configured blog item; pass an empty
/// list to keep its static entries.
///
/// # Errors
///
/// Fails when the terminal cannot be set up or restored, or when the
/// configured menu is empty.
pub async fn run(config: XmbConfig, posts: Vec<BlogPost>) -> Result<()> {
    ui::runtime::run_app(config, posts).await
}
