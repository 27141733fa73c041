//! Tweened translates for menu columns and sub-item rows.
//!
//! Every element keeps a resting translate in cells. A transition request
//! shifts the rest by the move's delta and eases the drawn value towards it.
//! When an element's tween ends its [`CompletionSignal`] is finished, which
//! is what lets the waiting navigator release the axis.

use std::time::{Duration, Instant};

use tracing::trace;
use xmb_engine::{CompletionSignal, NavigationState};
use xmb_types::{Axis, Direction};

use crate::port::TransitionRequest;
use crate::ui::layout::LayoutProfile;

pub fn ease_out_cubic(t: f32) -> f32 {
    let inverse = 1.0 - t.clamp(0.0, 1.0);
    1.0 - inverse * inverse * inverse
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f32,
    to: f32,
    started: Instant,
    duration: Duration,
}

impl Tween {
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_secs_f32();
        (elapsed / self.duration.as_secs_f32()).min(1.0)
    }

    fn value_at(&self, now: Instant) -> f32 {
        self.from + (self.to - self.from) * ease_out_cubic(self.progress(now))
    }
}

/// One element's translate along its axis.
#[derive(Debug, Default)]
struct Track {
    rest: f32,
    tween: Option<Tween>,
    signal: Option<CompletionSignal>,
}

impl Track {
    fn at_rest(rest: f32) -> Self {
        Self {
            rest,
            ..Self::default()
        }
    }

    fn value_at(&self, now: Instant) -> f32 {
        self.tween.map_or(self.rest, |tween| tween.value_at(now))
    }

    fn shift(&mut self, delta: f32, now: Instant, duration: Duration, signal: Option<CompletionSignal>) {
        let from = self.value_at(now);
        self.settle();
        self.rest += delta;
        self.tween = Some(Tween {
            from,
            to: self.rest,
            started: now,
            duration,
        });
        self.signal = signal;
    }

    fn settle(&mut self) {
        self.tween = None;
        if let Some(signal) = self.signal.take() {
            signal.finish();
        }
    }

    /// Returns `true` while the tween is still running.
    fn tick(&mut self, now: Instant) -> bool {
        match self.tween {
            Some(tween) if tween.progress(now) >= 1.0 => {
                self.settle();
                false
            }
            Some(_) => true,
            None => false,
        }
    }
}

#[derive(Debug)]
pub struct Motion {
    profile: LayoutProfile,
    horizontal_duration: Duration,
    vertical_duration: Duration,
    columns: Vec<Track>,
    rows: Vec<Vec<Track>>,
}

impl Motion {
    pub fn new(profile: LayoutProfile, horizontal_duration: Duration, vertical_duration: Duration, state: &NavigationState) -> Self {
        let mut motion = Self {
            profile,
            horizontal_duration,
            vertical_duration,
            columns: Vec::new(),
            rows: Vec::new(),
        };
        motion.relayout(profile, state);
        motion
    }

    pub fn profile(&self) -> LayoutProfile {
        self.profile
    }

    /// Snap every element to its resting translate for `state`.
    ///
    /// Running tweens end immediately and report completion.
    pub fn relayout(&mut self, profile: LayoutProfile, state: &NavigationState) {
        self.settle_all();
        self.profile = profile;
        let active = state.active_menu_index();
        self.columns = (0..state.menu().len())
            .map(|index| Track::at_rest(profile.column_rest(index, active)))
            .collect();
        self.rows = state
            .menu()
            .iter()
            .map(|sub_menu| {
                let active_sub = sub_menu.active_index().unwrap_or_default();
                (0..sub_menu.count())
                    .map(|index| Track::at_rest(profile.row_rest(index, active_sub)))
                    .collect()
            })
            .collect();
    }

    /// Start the tweens for one accepted move.
    pub fn begin(&mut self, request: TransitionRequest, now: Instant) {
        let TransitionRequest { change, signals } = request;
        let (tracks, duration, deltas): (&mut Vec<Track>, Duration, Vec<f32>) = match (change.axis, change.direction) {
            (Axis::Horizontal, Direction::Horizontal(direction)) => {
                let delta = -f32::from(self.profile.horizontal_step) * direction.index_delta() as f32;
                let deltas = vec![delta; self.columns.len()];
                (&mut self.columns, self.horizontal_duration, deltas)
            }
            (Axis::Vertical, Direction::Vertical(direction)) => {
                let Some(rows) = self.rows.get_mut(change.menu_index) else {
                    signals.into_iter().for_each(CompletionSignal::finish);
                    return;
                };
                let sign = -(direction.index_delta() as f32);
                let base = f32::from(self.profile.vertical_step);
                let extra = f32::from(self.profile.vertical_offset);
                let deltas = (0..rows.len())
                    .map(|index| if change.offset_index == Some(index) { (base + extra) * sign } else { base * sign })
                    .collect();
                (rows, self.vertical_duration, deltas)
            }
            _ => {
                signals.into_iter().for_each(CompletionSignal::finish);
                return;
            }
        };

        let mut by_element: Vec<Option<CompletionSignal>> = (0..tracks.len()).map(|_| None).collect();
        for signal in signals {
            match by_element.get_mut(signal.element()) {
                Some(slot) => *slot = Some(signal),
                None => signal.finish(),
            }
        }
        trace!(axis = %change.axis, elements = tracks.len(), "starting tweens");
        for ((track, delta), signal) in tracks.iter_mut().zip(deltas).zip(by_element) {
            track.shift(delta, now, duration, signal);
        }
    }

    /// Advance tweens to `now`. Returns `true` while anything is still moving.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut animating = false;
        for track in self.columns.iter_mut().chain(self.rows.iter_mut().flatten()) {
            animating |= track.tick(now);
        }
        animating
    }

    pub fn is_animating(&self) -> bool {
        self.columns
            .iter()
            .chain(self.rows.iter().flatten())
            .any(|track| track.tween.is_some())
    }

    pub fn column_offset(&self, menu_index: usize, now: Instant) -> Option<f32> {
        self.columns.get(menu_index).map(|track| track.value_at(now))
    }

    pub fn row_offset(&self, menu_index: usize, sub_index: usize, now: Instant) -> Option<f32> {
        self.rows.get(menu_index)?.get(sub_index).map(|track| track.value_at(now))
    }

    fn settle_all(&mut self) {
        for track in self.columns.iter_mut().chain(self.rows.iter_mut().flatten()) {
            if track.tween.is_some() {
                track.settle();
            }
        }
    }
}
