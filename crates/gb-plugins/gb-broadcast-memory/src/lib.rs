//! # gb-broadcast-memory
//!
//! In-process implementation of `BroadcastGateway` over a tokio broadcast
//! channel. Fan-out is lossy by construction: observers that fall behind the
//! channel capacity miss events instead of backpressuring the scheduler.

use tokio::sync::broadcast;

use gb_core::{BroadcastEvent, BroadcastGateway};

/// Default channel depth. Events are small and observers consume them at
/// human pace (one per second), so a short buffer is plenty.
const DEFAULT_CAPACITY: usize = 64;

pub struct BroadcastChannel {
    tx: broadcast::Sender<BroadcastEvent>,
}

impl BroadcastChannel {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }
}

impl Default for BroadcastChannel {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BroadcastGateway for BroadcastChannel {
    fn publish(&self, event: BroadcastEvent) {
        // send() errs only when there are zero receivers; an empty room
        // is a normal state for this service, not a failure.
        let _ = self.tx.send(event);
    }

    fn subscribe(&self) -> broadcast::Receiver<BroadcastEvent> {
        self.tx.subscribe()
    }

    fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fan_out_reaches_every_observer() {
        let gateway = BroadcastChannel::default();
        let mut a = gateway.subscribe();
        let mut b = gateway.subscribe();
        assert_eq!(gateway.observer_count(), 2);

        gateway.publish(BroadcastEvent::NewGossip { queue_length: 1, user_usage: 1 });

        for rx in [&mut a, &mut b] {
            match rx.recv().await.unwrap() {
                BroadcastEvent::NewGossip { queue_length, user_usage } => {
                    assert_eq!(queue_length, 1);
                    assert_eq!(user_usage, 1);
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_publish_without_observers_is_a_no_op() {
        let gateway = BroadcastChannel::default();
        assert_eq!(gateway.observer_count(), 0);
        // Must not panic or error out.
        gateway.publish(BroadcastEvent::CurrentState { active_gossip: None, queue_length: 0 });
    }
}
