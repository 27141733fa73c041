//! Bridge between the navigator and the render loop.
//!
//! Moves run on spawned tasks while tweens live in the event loop. The
//! [`AnimationPort`] forwards each change together with its per-element
//! completion signals over a channel; the loop starts the tweens and
//! finishes each signal when that element settles.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use xmb_engine::{CompletionGroup, CompletionSignal, TransitionPort};
use xmb_types::ActiveIndexChanged;

/// A change waiting to be animated, with one signal per affected element.
#[derive(Debug)]
pub struct TransitionRequest {
    pub change: ActiveIndexChanged,
    pub signals: Vec<CompletionSignal>,
}

#[derive(Debug, Clone)]
pub struct AnimationPort {
    sender: mpsc::UnboundedSender<TransitionRequest>,
}

impl AnimationPort {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TransitionRequest>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl TransitionPort for AnimationPort {
    async fn begin_transition(&self, change: &ActiveIndexChanged) -> CompletionGroup {
        let (group, signals) = CompletionGroup::new(change.affected_elements);
        debug!(axis = %change.axis, old = change.old_index, new = change.new_index, "queueing transition");
        let request = TransitionRequest {
            change: change.clone(),
            signals,
        };
        // A closed receiver drops the signals, which resolves the group as abandoned.
        if self.sender.send(request).is_err() {
            warn!(axis = %change.axis, "render loop is gone; transition abandoned");
        }
        group
    }
}
