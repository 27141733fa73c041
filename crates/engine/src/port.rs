//! Transition ports: how the navigator asks a presentation layer to animate.
//!
//! The navigator never touches visuals. For every accepted move it hands an
//! [`ActiveIndexChanged`] to its port and awaits the returned
//! [`CompletionGroup`]. Implementations:
//! - [`InstantPort`]: finishes every element before returning (headless use).
//! - [`ManualPort`]: records changes and holds signals until released; used
//!   by tests to observe in-flight moves.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use xmb_types::ActiveIndexChanged;

use crate::completion::{CompletionGroup, CompletionSignal};

/// Injected completion source for move transitions.
#[async_trait]
pub trait TransitionPort: Send + Sync {
    /// Start visuals for `change` and return the group that resolves once
    /// every affected element finished its transition.
    async fn begin_transition(&self, change: &ActiveIndexChanged) -> CompletionGroup;
}

/// Port that completes every transition synchronously.
#[derive(Debug, Default, Clone, Copy)]
pub struct InstantPort;

#[async_trait]
impl TransitionPort for InstantPort {
    async fn begin_transition(&self, change: &ActiveIndexChanged) -> CompletionGroup {
        let (group, signals) = CompletionGroup::new(change.affected_elements);
        signals.into_iter().for_each(CompletionSignal::finish);
        group
    }
}

/// Port whose transitions stay in flight until the owner releases them.
#[derive(Debug, Default)]
pub struct ManualPort {
    inner: Mutex<ManualPortInner>,
}

#[derive(Debug, Default)]
struct ManualPortInner {
    changes: Vec<ActiveIndexChanged>,
    pending: Vec<CompletionSignal>,
}

impl ManualPort {
    /// Every change seen so far, in order.
    pub fn changes(&self) -> Vec<ActiveIndexChanged> {
        self.lock().changes.clone()
    }

    /// Number of element signals waiting to be finished.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Finish every outstanding element signal.
    pub fn release_all(&self) {
        let signals = std::mem::take(&mut self.lock().pending);
        signals.into_iter().for_each(CompletionSignal::finish);
    }

    /// Finish only the first `count` outstanding signals.
    pub fn release(&self, count: usize) {
        let signals: Vec<_> = {
            let mut inner = self.lock();
            let count = count.min(inner.pending.len());
            inner.pending.drain(..count).collect()
        };
        signals.into_iter().for_each(CompletionSignal::finish);
    }

    /// Drop every outstanding signal without finishing it.
    pub fn abandon_all(&self) {
        self.lock().pending.clear();
    }

    fn lock(&self) -> MutexGuard<'_, ManualPortInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TransitionPort for ManualPort {
    async fn begin_transition(&self, change: &ActiveIndexChanged) -> CompletionGroup {
        let (group, signals) = CompletionGroup::new(change.affected_elements);
        let mut inner = self.lock();
        inner.changes.push(change.clone());
        inner.pending.extend(signals);
        group
    }
}
