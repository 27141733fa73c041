//! # XMB Engine
//!
//! Navigation state machine for an XMB-style cross menu: a row of top-level
//! items, each with an optional vertical sub-menu.
//!
//! The engine tracks the active menu item and each item's sub-selection,
//! validates single-step move requests, and serialises them per axis with a
//! busy guard. Visual work is delegated to an injected [`TransitionPort`];
//! a move is over once every element the port animated has reported
//! completion, or once the fallback timeout fires.
//!
//! ## Usage
//!
//! ```rust
//! use xmb_engine::{InstantPort, MenuCollection, MoveOutcome, Navigator};
//! use xmb_types::HorizontalDirection;
//!
//! # tokio_test_block_on(async {
//! let menu = MenuCollection::from_counts([Some(2), None, Some(3)])?;
//! let navigator = Navigator::new(menu, InstantPort);
//! assert_eq!(navigator.move_horizontal(HorizontalDirection::Right).await, MoveOutcome::Completed);
//! assert_eq!(navigator.active_menu_index(), 1);
//! # Ok::<(), xmb_engine::EngineError>(())
//! # }).unwrap();
//! # fn tokio_test_block_on<F: std::future::Future>(future: F) -> F::Output {
//! #     tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(future)
//! # }
//! ```

pub mod completion;
pub mod error;
pub mod menu;
pub mod navigator;
pub mod port;

pub use completion::{CompletionGroup, CompletionOutcome, CompletionSignal};
pub use error::{EngineError, MoveRejected};
pub use menu::MenuCollection;
pub use navigator::{DEFAULT_COMPLETION_TIMEOUT, MoveOutcome, NavigationState, Navigator, NavigatorSettings};
pub use port::{InstantPort, ManualPort, TransitionPort};
