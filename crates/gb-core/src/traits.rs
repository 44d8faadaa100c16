//! # Core Traits (Ports)
//!
//! The realtime transport is an external collaborator: the engine publishes
//! through this port and never learns what carries the events (SSE in the
//! shipped binary, anything fan-out-shaped in tests).

use tokio::sync::broadcast;

use crate::events::BroadcastEvent;

/// Fan-out delivery of state-change events to every connected observer.
///
/// Implementations must be lossy rather than blocking: a slow or absent
/// observer never stalls the scheduler.
pub trait BroadcastGateway: Send + Sync {
    /// Deliver `event` to all current observers. No per-observer filtering.
    fn publish(&self, event: BroadcastEvent);

    /// Register a new observer. The caller is responsible for sending the
    /// `current-state` snapshot before draining the receiver.
    fn subscribe(&self) -> broadcast::Receiver<BroadcastEvent>;

    /// Number of currently connected observers.
    fn observer_count(&self) -> usize;
}
