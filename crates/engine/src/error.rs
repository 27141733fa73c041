use thiserror::Error;
use xmb_types::Axis;

/// Reason a move request was dropped.
///
/// Rejections are not failures: the request becomes a no-op and the reason
/// is only logged. The variants exist so callers and tests can tell which
/// guard fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveRejected {
    #[error("cannot move horizontally: already at the first menu item")]
    AtFirstMenuItem,
    #[error("cannot move horizontally: already at the last menu item")]
    AtLastMenuItem,
    #[error("menu item {menu_index} has no sub menu items")]
    NoSubItems { menu_index: usize },
    #[error("cannot move vertically: already at the first sub menu item")]
    AtFirstSubItem,
    #[error("cannot move vertically: already at the last sub menu item")]
    AtLastSubItem,
    #[error("already transitioning on the {0} axis")]
    AxisBusy(Axis),
    #[error("target index {target} is outside 0..{len}")]
    TargetOutOfRange { target: usize, len: usize },
    #[error("menu item {menu_index} is not active (active item is {active_menu_index})")]
    InactiveMenuItem { menu_index: usize, active_menu_index: usize },
}

/// Errors raised while building or re-initialising a navigator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("a menu needs at least one top-level item")]
    EmptyMenu,
    #[error("menu has {actual} top-level items but the navigator was built with {expected}")]
    MenuLengthMismatch { expected: usize, actual: usize },
    #[error("cannot reload the menu while a {0} transition is in flight")]
    Busy(Axis),
}
