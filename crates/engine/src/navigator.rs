//! The navigation state machine.
//!
//! A [`Navigator`] owns the active coordinates of one cross menu and turns
//! directional requests into single-step transitions:
//!
//! - Guards run first. A rejected request is a logged no-op.
//! - An accepted request marks its axis busy, updates the index, notifies
//!   the [`TransitionPort`] and suspends until the port's completion group
//!   resolves (or the fallback timeout fires).
//! - The busy flag is cleared by a guard, so it also clears if the caller
//!   drops the move future early.
//!
//! Horizontal and vertical moves are guarded independently and may overlap.
//! State sits behind a mutex that is never held across an await, so two
//! concurrent requests on one axis see each other's busy flag.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tracing::{debug, info, warn};
use xmb_types::{ActiveIndexChanged, Axis, HorizontalDirection, SubMenu, VerticalDirection};

use crate::completion::CompletionOutcome;
use crate::error::{EngineError, MoveRejected};
use crate::menu::MenuCollection;
use crate::port::TransitionPort;

/// Default deadline before a stuck transition is forcibly completed.
pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(2);

/// Result of a move request. Never an error: rejections are data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Accepted and every element reported completion.
    Completed,
    /// Dropped by a guard; state is unchanged.
    Rejected(MoveRejected),
    /// Accepted, but the completion deadline passed; the axis was freed anyway.
    TimedOut,
    /// Accepted, but some elements went away without reporting.
    Abandoned,
}

impl MoveOutcome {
    /// Whether the request changed the active index.
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Tunables for a navigator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigatorSettings {
    /// Deadline for a transition's completion group. `None` waits forever.
    pub completion_timeout: Option<Duration>,
}

impl Default for NavigatorSettings {
    fn default() -> Self {
        Self {
            completion_timeout: Some(DEFAULT_COMPLETION_TIMEOUT),
        }
    }
}

/// Point-in-time copy of a navigator's state, for renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    menu: MenuCollection,
    active_menu_index: usize,
    horizontal_busy: bool,
    vertical_busy: bool,
}

impl NavigationState {
    fn new(menu: MenuCollection) -> Self {
        Self {
            menu,
            active_menu_index: 0,
            horizontal_busy: false,
            vertical_busy: false,
        }
    }

    pub fn active_menu_index(&self) -> usize {
        self.active_menu_index
    }

    pub fn menu(&self) -> &MenuCollection {
        &self.menu
    }

    pub fn sub_menu(&self, menu_index: usize) -> Option<SubMenu> {
        self.menu.get(menu_index).copied()
    }

    pub fn active_sub_index(&self, menu_index: usize) -> Option<usize> {
        self.menu.get(menu_index).and_then(SubMenu::active_index)
    }

    pub fn is_busy(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.horizontal_busy,
            Axis::Vertical => self.vertical_busy,
        }
    }

    fn set_busy(&mut self, axis: Axis, busy: bool) {
        match axis {
            Axis::Horizontal => self.horizontal_busy = busy,
            Axis::Vertical => self.vertical_busy = busy,
        }
    }

    fn begin_horizontal(&mut self, direction: HorizontalDirection) -> Result<ActiveIndexChanged, MoveRejected> {
        let old_index = self.active_menu_index;
        let new_index = match direction {
            HorizontalDirection::Right if old_index >= self.menu.last_index() => {
                return Err(MoveRejected::AtLastMenuItem);
            }
            HorizontalDirection::Left if old_index == 0 => return Err(MoveRejected::AtFirstMenuItem),
            HorizontalDirection::Right => old_index + 1,
            HorizontalDirection::Left => old_index - 1,
        };
        if self.horizontal_busy {
            return Err(MoveRejected::AxisBusy(Axis::Horizontal));
        }

        self.horizontal_busy = true;
        self.active_menu_index = new_index;
        Ok(ActiveIndexChanged {
            axis: Axis::Horizontal,
            menu_index: new_index,
            old_index,
            new_index,
            direction: direction.into(),
            offset_index: None,
            affected_elements: self.menu.len(),
        })
    }

    fn begin_vertical(&mut self, direction: VerticalDirection) -> Result<ActiveIndexChanged, MoveRejected> {
        let menu_index = self.active_menu_index;
        let (count, old_index) = match self.menu.get(menu_index) {
            Some(SubMenu::HasSubItems { count, active_index }) => (*count, *active_index),
            _ => return Err(MoveRejected::NoSubItems { menu_index }),
        };
        // The offset lands on the sub-item leaving the column upwards (Down)
        // or on the one coming back down from above (Up).
        let (new_index, offset_index) = match direction {
            VerticalDirection::Down if old_index + 1 >= count => return Err(MoveRejected::AtLastSubItem),
            VerticalDirection::Up if old_index == 0 => return Err(MoveRejected::AtFirstSubItem),
            VerticalDirection::Down => (old_index + 1, old_index),
            VerticalDirection::Up => (old_index - 1, old_index - 1),
        };
        if self.vertical_busy {
            return Err(MoveRejected::AxisBusy(Axis::Vertical));
        }

        self.vertical_busy = true;
        if let Some(sub_menu) = self.menu.get_mut(menu_index) {
            *sub_menu = SubMenu::HasSubItems {
                count,
                active_index: new_index,
            };
        }
        Ok(ActiveIndexChanged {
            axis: Axis::Vertical,
            menu_index,
            old_index,
            new_index,
            direction: direction.into(),
            offset_index: Some(offset_index),
            affected_elements: count,
        })
    }
}

/// Clears an axis' busy flag when dropped.
struct BusyGuard<'a> {
    state: &'a Mutex<NavigationState>,
    axis: Axis,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).set_busy(self.axis, false);
    }
}

fn lock(state: &Mutex<NavigationState>) -> MutexGuard<'_, NavigationState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Serialises directional requests for one cross menu.
#[derive(Debug)]
pub struct Navigator<P> {
    port: P,
    state: Mutex<NavigationState>,
    settings: NavigatorSettings,
}

impl<P: TransitionPort> Navigator<P> {
    pub fn new(menu: MenuCollection, port: P) -> Self {
        Self::with_settings(menu, port, NavigatorSettings::default())
    }

    pub fn with_settings(menu: MenuCollection, port: P, settings: NavigatorSettings) -> Self {
        info!(items = menu.len(), "navigator initialised");
        Self {
            port,
            state: Mutex::new(NavigationState::new(menu)),
            settings,
        }
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    pub fn snapshot(&self) -> NavigationState {
        lock(&self.state).clone()
    }

    pub fn active_menu_index(&self) -> usize {
        lock(&self.state).active_menu_index
    }

    pub fn active_sub_index(&self, menu_index: usize) -> Option<usize> {
        lock(&self.state).active_sub_index(menu_index)
    }

    pub fn sub_menu(&self, menu_index: usize) -> Option<SubMenu> {
        lock(&self.state).sub_menu(menu_index)
    }

    pub fn menu_len(&self) -> usize {
        lock(&self.state).menu.len()
    }

    pub fn is_busy(&self, axis: Axis) -> bool {
        lock(&self.state).is_busy(axis)
    }

    /// Move the active menu item one step left or right.
    pub async fn move_horizontal(&self, direction: HorizontalDirection) -> MoveOutcome {
        let begun = lock(&self.state).begin_horizontal(direction);
        match begun {
            Ok(change) => self.run_transition(change).await,
            Err(reason) => {
                debug!(%reason, ?direction, "horizontal move rejected");
                MoveOutcome::Rejected(reason)
            }
        }
    }

    /// Move the active item's sub-selection one step up or down.
    pub async fn move_vertical(&self, direction: VerticalDirection) -> MoveOutcome {
        let begun = lock(&self.state).begin_vertical(direction);
        match begun {
            Ok(change) => self.run_transition(change).await,
            Err(reason) => {
                debug!(%reason, ?direction, "vertical move rejected");
                MoveOutcome::Rejected(reason)
            }
        }
    }

    /// Walk to `target` one horizontal step at a time, awaiting each step.
    pub async fn set_active_menu_index(&self, target: usize) -> MoveOutcome {
        let len = self.menu_len();
        if target >= len {
            let reason = MoveRejected::TargetOutOfRange { target, len };
            debug!(%reason, "menu jump rejected");
            return MoveOutcome::Rejected(reason);
        }

        let mut result = MoveOutcome::Completed;
        while let Some(direction) = HorizontalDirection::towards(self.active_menu_index(), target) {
            match self.move_horizontal(direction).await {
                MoveOutcome::Completed => {}
                rejected @ MoveOutcome::Rejected(_) => return rejected,
                degraded => result = degraded,
            }
        }
        result
    }

    /// Walk the sub-selection of `menu_index` to `target`, one step at a time.
    ///
    /// Only the active menu item's column can be driven.
    pub async fn set_active_sub_index(&self, menu_index: usize, target: usize) -> MoveOutcome {
        if let Err(reason) = self.check_sub_target(menu_index, target) {
            debug!(%reason, "sub menu jump rejected");
            return MoveOutcome::Rejected(reason);
        }

        let mut result = MoveOutcome::Completed;
        loop {
            let current = {
                let state = lock(&self.state);
                if state.active_menu_index != menu_index {
                    let reason = MoveRejected::InactiveMenuItem {
                        menu_index,
                        active_menu_index: state.active_menu_index,
                    };
                    debug!(%reason, "sub menu jump interrupted");
                    return MoveOutcome::Rejected(reason);
                }
                state.active_sub_index(menu_index)
            };
            let Some(direction) = current.and_then(|current| VerticalDirection::towards(current, target)) else {
                return result;
            };
            match self.move_vertical(direction).await {
                MoveOutcome::Completed => {}
                rejected @ MoveOutcome::Rejected(_) => return rejected,
                degraded => result = degraded,
            }
        }
    }

    /// Re-initialise after sub-items were replaced wholesale.
    ///
    /// The active menu index is kept; every sub-selection restarts at 0.
    pub fn reload(&self, menu: MenuCollection) -> Result<(), EngineError> {
        let mut state = lock(&self.state);
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if state.is_busy(axis) {
                return Err(EngineError::Busy(axis));
            }
        }
        if menu.len() != state.menu.len() {
            return Err(EngineError::MenuLengthMismatch {
                expected: state.menu.len(),
                actual: menu.len(),
            });
        }
        state.menu = menu;
        info!(active = state.active_menu_index, "navigator reloaded");
        Ok(())
    }

    fn check_sub_target(&self, menu_index: usize, target: usize) -> Result<(), MoveRejected> {
        let state = lock(&self.state);
        if menu_index != state.active_menu_index {
            return Err(MoveRejected::InactiveMenuItem {
                menu_index,
                active_menu_index: state.active_menu_index,
            });
        }
        match state.menu.get(menu_index) {
            Some(SubMenu::HasSubItems { count, .. }) if target < *count => Ok(()),
            Some(SubMenu::HasSubItems { count, .. }) => Err(MoveRejected::TargetOutOfRange { target, len: *count }),
            _ => Err(MoveRejected::NoSubItems { menu_index }),
        }
    }

    async fn run_transition(&self, change: ActiveIndexChanged) -> MoveOutcome {
        let _busy = BusyGuard {
            state: &self.state,
            axis: change.axis,
        };
        debug!(
            axis = %change.axis,
            menu_index = change.menu_index,
            old_index = change.old_index,
            new_index = change.new_index,
            offset_index = ?change.offset_index,
            "transition started"
        );

        let group = self.port.begin_transition(&change).await;
        let completion = match self.settings.completion_timeout {
            Some(timeout) => group.wait_with_timeout(timeout).await,
            None => group.wait().await,
        };

        match completion {
            CompletionOutcome::Completed => MoveOutcome::Completed,
            CompletionOutcome::Abandoned { missing } => {
                warn!(axis = %change.axis, missing, "transition abandoned by some elements; releasing axis");
                MoveOutcome::Abandoned
            }
            CompletionOutcome::TimedOut { pending } => {
                warn!(axis = %change.axis, pending, "transition did not complete in time; releasing axis");
                MoveOutcome::TimedOut
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{InstantPort, ManualPort};
    use futures_util::poll;
    use std::task::Poll;

    fn menu() -> MenuCollection {
        MenuCollection::from_counts([Some(2), None, Some(3)]).expect("menu")
    }

    fn manual_navigator() -> Navigator<ManualPort> {
        Navigator::with_settings(menu(), ManualPort::default(), NavigatorSettings { completion_timeout: None })
    }

    #[tokio::test]
    async fn edges_reject_horizontal_moves() {
        let navigator = Navigator::new(menu(), InstantPort);
        assert_eq!(
            navigator.move_horizontal(HorizontalDirection::Left).await,
            MoveOutcome::Rejected(MoveRejected::AtFirstMenuItem)
        );
        assert_eq!(navigator.active_menu_index(), 0);

        assert_eq!(navigator.set_active_menu_index(2).await, MoveOutcome::Completed);
        assert_eq!(
            navigator.move_horizontal(HorizontalDirection::Right).await,
            MoveOutcome::Rejected(MoveRejected::AtLastMenuItem)
        );
        assert_eq!(navigator.active_menu_index(), 2);
    }

    #[tokio::test]
    async fn second_horizontal_move_in_flight_is_dropped() {
        let navigator = manual_navigator();
        let first = navigator.move_horizontal(HorizontalDirection::Right);
        tokio::pin!(first);
        assert!(poll!(&mut first).is_pending());
        assert_eq!(navigator.active_menu_index(), 1);
        assert!(navigator.is_busy(Axis::Horizontal));

        let second = navigator.move_horizontal(HorizontalDirection::Right).await;
        assert_eq!(second, MoveOutcome::Rejected(MoveRejected::AxisBusy(Axis::Horizontal)));
        assert_eq!(navigator.active_menu_index(), 1);
        assert!(navigator.is_busy(Axis::Horizontal));

        navigator.port().release_all();
        assert_eq!(first.await, MoveOutcome::Completed);
        assert!(!navigator.is_busy(Axis::Horizontal));
    }

    #[tokio::test]
    async fn waits_for_every_element_before_clearing_busy() {
        let navigator = manual_navigator();
        let first = navigator.move_horizontal(HorizontalDirection::Right);
        tokio::pin!(first);
        assert!(poll!(&mut first).is_pending());
        assert_eq!(navigator.port().pending(), 3);

        navigator.port().release(2);
        assert!(poll!(&mut first).is_pending());
        assert!(navigator.is_busy(Axis::Horizontal));

        navigator.port().release(1);
        assert_eq!(poll!(&mut first), Poll::Ready(MoveOutcome::Completed));
    }

    #[tokio::test]
    async fn second_vertical_move_in_flight_is_dropped() {
        let navigator = manual_navigator();
        let first = navigator.move_vertical(VerticalDirection::Down);
        tokio::pin!(first);
        assert!(poll!(&mut first).is_pending());
        assert_eq!(navigator.active_sub_index(0), Some(1));

        let second = navigator.move_vertical(VerticalDirection::Up).await;
        assert_eq!(second, MoveOutcome::Rejected(MoveRejected::AxisBusy(Axis::Vertical)));
        assert_eq!(navigator.active_sub_index(0), Some(1));
        assert_eq!(navigator.port().changes().len(), 1);

        navigator.port().release_all();
        assert_eq!(first.await, MoveOutcome::Completed);
        assert!(!navigator.is_busy(Axis::Vertical));
    }

    #[tokio::test]
    async fn up_at_first_sub_item_is_rejected() {
        let navigator = Navigator::new(menu(), InstantPort);
        let before = navigator.snapshot();
        assert_eq!(
            navigator.move_vertical(VerticalDirection::Up).await,
            MoveOutcome::Rejected(MoveRejected::AtFirstSubItem)
        );
        assert_eq!(navigator.snapshot(), before);
    }

    #[tokio::test]
    async fn single_item_menu_ignores_horizontal_moves() {
        let navigator = Navigator::new(MenuCollection::from_counts([Some(2)]).expect("menu"), InstantPort);
        assert_eq!(
            navigator.move_horizontal(HorizontalDirection::Right).await,
            MoveOutcome::Rejected(MoveRejected::AtLastMenuItem)
        );
        assert_eq!(
            navigator.move_horizontal(HorizontalDirection::Left).await,
            MoveOutcome::Rejected(MoveRejected::AtFirstMenuItem)
        );
        assert_eq!(navigator.active_menu_index(), 0);
        assert!(!navigator.is_busy(Axis::Horizontal));
        assert_eq!(navigator.move_vertical(VerticalDirection::Down).await, MoveOutcome::Completed);
    }

    #[tokio::test]
    async fn axes_do_not_block_each_other() {
        let navigator = manual_navigator();
        let vertical = navigator.move_vertical(VerticalDirection::Down);
        tokio::pin!(vertical);
        assert!(poll!(&mut vertical).is_pending());
        assert!(navigator.is_busy(Axis::Vertical));

        let horizontal = navigator.move_horizontal(HorizontalDirection::Right);
        tokio::pin!(horizontal);
        assert!(poll!(&mut horizontal).is_pending());
        assert!(navigator.is_busy(Axis::Horizontal));

        navigator.port().release_all();
        assert_eq!(vertical.await, MoveOutcome::Completed);
        assert_eq!(horizontal.await, MoveOutcome::Completed);
        assert_eq!(navigator.active_sub_index(0), Some(1));
        assert_eq!(navigator.active_menu_index(), 1);
    }

    #[tokio::test]
    async fn vertical_move_without_sub_items_is_a_no_op() {
        let navigator = Navigator::new(menu(), InstantPort);
        navigator.move_horizontal(HorizontalDirection::Right).await;
        let before = navigator.snapshot();
        for direction in [VerticalDirection::Down, VerticalDirection::Up] {
            assert_eq!(
                navigator.move_vertical(direction).await,
                MoveOutcome::Rejected(MoveRejected::NoSubItems { menu_index: 1 })
            );
        }
        assert_eq!(navigator.snapshot(), before);
    }

    #[tokio::test]
    async fn offset_index_follows_the_vacated_item() {
        let navigator = Navigator::with_settings(
            MenuCollection::from_counts([Some(3)]).expect("menu"),
            ManualPort::default(),
            NavigatorSettings { completion_timeout: None },
        );

        let down = navigator.move_vertical(VerticalDirection::Down);
        tokio::pin!(down);
        assert!(poll!(&mut down).is_pending());
        navigator.port().release_all();
        down.await;

        let down = navigator.move_vertical(VerticalDirection::Down);
        tokio::pin!(down);
        assert!(poll!(&mut down).is_pending());
        navigator.port().release_all();
        down.await;

        let up = navigator.move_vertical(VerticalDirection::Up);
        tokio::pin!(up);
        assert!(poll!(&mut up).is_pending());
        navigator.port().release_all();
        up.await;

        let offsets: Vec<_> = navigator
            .port()
            .changes()
            .into_iter()
            .filter(|change| change.axis == Axis::Vertical)
            .map(|change| (change.old_index, change.new_index, change.offset_index))
            .collect();
        assert_eq!(offsets, vec![(0, 1, Some(0)), (1, 2, Some(1)), (2, 1, Some(1))]);
    }

    #[tokio::test]
    async fn sub_selection_survives_horizontal_round_trip() {
        let navigator = Navigator::new(menu(), InstantPort);
        assert_eq!(navigator.move_vertical(VerticalDirection::Down).await, MoveOutcome::Completed);
        navigator.set_active_menu_index(2).await;
        navigator.set_active_menu_index(0).await;
        assert_eq!(navigator.active_sub_index(0), Some(1));
    }

    #[tokio::test]
    async fn dropping_a_move_future_frees_the_axis() {
        let navigator = manual_navigator();
        {
            let first = navigator.move_horizontal(HorizontalDirection::Right);
            tokio::pin!(first);
            assert!(poll!(&mut first).is_pending());
            assert!(navigator.is_busy(Axis::Horizontal));
        }
        assert!(!navigator.is_busy(Axis::Horizontal));
        assert_eq!(navigator.active_menu_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stuck_transition_times_out_and_frees_the_axis() {
        let navigator = Navigator::with_settings(
            menu(),
            ManualPort::default(),
            NavigatorSettings {
                completion_timeout: Some(Duration::from_millis(500)),
            },
        );
        assert_eq!(navigator.move_horizontal(HorizontalDirection::Right).await, MoveOutcome::TimedOut);
        assert!(!navigator.is_busy(Axis::Horizontal));
        assert_eq!(navigator.move_horizontal(HorizontalDirection::Left).await, MoveOutcome::TimedOut);
        assert_eq!(navigator.active_menu_index(), 0);
    }

    #[tokio::test]
    async fn abandoned_signals_free_the_axis() {
        let navigator = manual_navigator();
        let first = navigator.move_horizontal(HorizontalDirection::Right);
        tokio::pin!(first);
        assert!(poll!(&mut first).is_pending());
        navigator.port().abandon_all();
        assert_eq!(first.await, MoveOutcome::Abandoned);
        assert!(!navigator.is_busy(Axis::Horizontal));
    }

    #[tokio::test]
    async fn sub_jump_requires_the_active_menu_item() {
        let navigator = Navigator::new(menu(), InstantPort);
        assert_eq!(
            navigator.set_active_sub_index(2, 1).await,
            MoveOutcome::Rejected(MoveRejected::InactiveMenuItem {
                menu_index: 2,
                active_menu_index: 0
            })
        );
        assert_eq!(
            navigator.set_active_sub_index(0, 5).await,
            MoveOutcome::Rejected(MoveRejected::TargetOutOfRange { target: 5, len: 2 })
        );
        assert_eq!(navigator.set_active_sub_index(0, 1).await, MoveOutcome::Completed);
        assert_eq!(navigator.active_sub_index(0), Some(1));
    }

    #[tokio::test]
    async fn reload_keeps_active_item_and_resets_sub_selection() {
        let navigator = Navigator::new(menu(), InstantPort);
        navigator.move_vertical(VerticalDirection::Down).await;
        navigator.set_active_menu_index(2).await;

        let replaced = MenuCollection::from_counts([Some(4), None, Some(5)]).expect("menu");
        navigator.reload(replaced).expect("reload");
        assert_eq!(navigator.active_menu_index(), 2);
        assert_eq!(navigator.active_sub_index(0), Some(0));
        assert_eq!(navigator.sub_menu(2), Some(SubMenu::HasSubItems { count: 5, active_index: 0 }));

        let shorter = MenuCollection::from_counts([Some(1)]).expect("menu");
        assert_eq!(
            navigator.reload(shorter),
            Err(EngineError::MenuLengthMismatch { expected: 3, actual: 1 })
        );
    }

    #[tokio::test]
    async fn reload_is_refused_while_busy() {
        let navigator = manual_navigator();
        let first = navigator.move_horizontal(HorizontalDirection::Right);
        tokio::pin!(first);
        assert!(poll!(&mut first).is_pending());
        assert_eq!(navigator.reload(menu()), Err(EngineError::Busy(Axis::Horizontal)));
        navigator.port().release_all();
        first.await;
        assert_eq!(navigator.reload(menu()), Ok(()));
    }
}
