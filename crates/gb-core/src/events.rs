//! # Broadcast Events
//!
//! The server→client realtime vocabulary. Event names and payload fields
//! mirror the public wire contract (`new-gossip`, `gossip-display`,
//! `countdown`, `current-state`), so these serialize straight onto the
//! transport without a mapping layer.

use serde::Serialize;

use crate::models::GossipItem;

/// One state-change notification, fanned out to every connected observer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum BroadcastEvent {
    /// A submission was accepted into the queue.
    #[serde(rename_all = "camelCase")]
    NewGossip { queue_length: usize, user_usage: u32 },

    /// The display slot changed hands: a new item went up, or the slot
    /// emptied (`gossip: null`).
    #[serde(rename_all = "camelCase")]
    GossipDisplay {
        gossip: Option<GossipItem>,
        time_left: u32,
        queue_length: usize,
    },

    /// One second elapsed on the active item's countdown.
    #[serde(rename_all = "camelCase")]
    Countdown { time_left: u32, gossip: GossipItem },

    /// Snapshot sent once to each newly connected observer so late joiners
    /// synchronize without any history replay.
    #[serde(rename_all = "camelCase")]
    CurrentState {
        active_gossip: Option<GossipItem>,
        queue_length: usize,
    },
}

impl BroadcastEvent {
    /// Wire name of the event, e.g. `"gossip-display"`.
    pub fn name(&self) -> &'static str {
        match self {
            BroadcastEvent::NewGossip { .. } => "new-gossip",
            BroadcastEvent::GossipDisplay { .. } => "gossip-display",
            BroadcastEvent::Countdown { .. } => "countdown",
            BroadcastEvent::CurrentState { .. } => "current-state",
        }
    }
}
