//! Fan-in of per-element "transition finished" reports.
//!
//! A move touches N visual elements. The presentation layer receives one
//! [`CompletionSignal`] per element and finishes it when that element's
//! transition ends; the navigator awaits the matching [`CompletionGroup`].
//! The group resolves only after every signal reported once. `finish`
//! consumes the signal, so an element cannot report twice.

use std::time::Duration;

use futures_util::{StreamExt, stream::FuturesUnordered};
use tokio::sync::oneshot;

/// One element's completion report handle.
#[derive(Debug)]
pub struct CompletionSignal {
    element: usize,
    sender: oneshot::Sender<()>,
}

impl CompletionSignal {
    /// Index of the element inside the transition (menu item or sub-item index).
    pub fn element(&self) -> usize {
        self.element
    }

    /// Reports that this element's transition ended.
    pub fn finish(self) {
        // The group may already be gone after a timeout.
        let _ = self.sender.send(());
    }
}

/// How a completion wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// Every element reported.
    Completed,
    /// All signals are gone but `missing` of them were dropped without reporting.
    Abandoned { missing: usize },
    /// The deadline passed with `pending` elements still outstanding.
    TimedOut { pending: usize },
}

/// Awaitable side of a transition's completion reports.
#[derive(Debug, Default)]
pub struct CompletionGroup {
    receivers: Vec<oneshot::Receiver<()>>,
}

impl CompletionGroup {
    /// Creates a group expecting `elements` reports, plus the signals to hand out.
    pub fn new(elements: usize) -> (Self, Vec<CompletionSignal>) {
        let mut receivers = Vec::with_capacity(elements);
        let mut signals = Vec::with_capacity(elements);
        for element in 0..elements {
            let (sender, receiver) = oneshot::channel();
            receivers.push(receiver);
            signals.push(CompletionSignal { element, sender });
        }
        (Self { receivers }, signals)
    }

    /// A group with nothing to wait for.
    pub fn resolved() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    /// Waits for every element with no deadline.
    pub async fn wait(self) -> CompletionOutcome {
        let mut pending: FuturesUnordered<_> = self.receivers.into_iter().collect();
        let mut missing = 0;
        while let Some(report) = pending.next().await {
            if report.is_err() {
                missing += 1;
            }
        }
        outcome_for(missing)
    }

    /// Waits for every element, giving up once `timeout` elapses.
    pub async fn wait_with_timeout(self, timeout: Duration) -> CompletionOutcome {
        let mut pending: FuturesUnordered<_> = self.receivers.into_iter().collect();
        let mut missing = 0;
        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                report = pending.next() => match report {
                    Some(Ok(())) => {}
                    Some(Err(_)) => missing += 1,
                    None => break,
                },
                _ = &mut deadline => {
                    return CompletionOutcome::TimedOut { pending: pending.len() };
                }
            }
        }
        outcome_for(missing)
    }
}

fn outcome_for(missing: usize) -> CompletionOutcome {
    if missing == 0 {
        CompletionOutcome::Completed
    } else {
        CompletionOutcome::Abandoned { missing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_group_resolves_immediately() {
        assert_eq!(CompletionGroup::resolved().wait().await, CompletionOutcome::Completed);
        let (group, signals) = CompletionGroup::new(0);
        assert!(signals.is_empty());
        assert_eq!(group.wait().await, CompletionOutcome::Completed);
    }

    #[tokio::test]
    async fn resolves_after_every_element_reports() {
        let (group, signals) = CompletionGroup::new(3);
        assert_eq!(signals.iter().map(CompletionSignal::element).collect::<Vec<_>>(), vec![0, 1, 2]);

        let waiter = tokio::spawn(group.wait());
        let mut signals = signals.into_iter();
        signals.next().expect("signal").finish();
        signals.next().expect("signal").finish();
        tokio::task::yield_now().await;
        assert!(!waiter.is_finished());

        signals.next().expect("signal").finish();
        assert_eq!(waiter.await.expect("join"), CompletionOutcome::Completed);
    }

    #[tokio::test]
    async fn dropped_signal_counts_as_abandoned() {
        let (group, mut signals) = CompletionGroup::new(2);
        let dropped = signals.pop().expect("signal");
        drop(dropped);
        signals.pop().expect("signal").finish();
        assert_eq!(group.wait().await, CompletionOutcome::Abandoned { missing: 1 });
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_reports_outstanding_elements() {
        let (group, mut signals) = CompletionGroup::new(3);
        signals.pop().expect("signal").finish();
        let outcome = group.wait_with_timeout(Duration::from_secs(2)).await;
        assert_eq!(outcome, CompletionOutcome::TimedOut { pending: 2 });
        drop(signals);
    }
}
