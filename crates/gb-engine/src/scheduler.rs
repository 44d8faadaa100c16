//! # DisplayScheduler
//!
//! The single-slot display rotation. One tokio task owns the pending queue
//! and the display state and serializes every transition — enqueue, tick,
//! pacing, promote — so "promote on enqueue if idle" can never race with a
//! concurrent promotion. Timers live inside the task's `select!`; when the
//! phase changes the pending sleep is simply dropped, so no tick can fire
//! after its display ended.
//!
//! The transition rules themselves sit in [`SchedulerCore`], a pure state
//! machine with no clocks or channels, tested directly.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep_until, Instant};

use gb_core::{AppError, BroadcastEvent, BroadcastGateway, DisplayState, GossipItem, Result};

/// Seconds an item stays on the display slot.
pub const DISPLAY_SECONDS: u32 = 5;
/// Countdown granularity.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
/// Gap between one item's countdown ending and the next display starting.
pub const PACING_DELAY: Duration = Duration::from_secs(1);

/// Point-in-time view of the display for status endpoints and late joiners.
#[derive(Debug, Clone)]
pub struct DisplaySnapshot {
    pub state: DisplayState,
    pub queue_length: usize,
}

enum Command {
    Enqueue {
        item: GossipItem,
        user_usage: u32,
        reply: oneshot::Sender<usize>,
    },
    Snapshot {
        reply: oneshot::Sender<DisplaySnapshot>,
    },
}

/// Cloneable client side of the scheduler task.
#[derive(Clone)]
pub struct SchedulerHandle {
    tx: mpsc::Sender<Command>,
}

impl SchedulerHandle {
    /// Append an accepted item to the pending queue. Returns the queue
    /// length right after the push — the submitter's queue position — before
    /// any promotion the enqueue may have triggered.
    pub async fn enqueue(&self, item: GossipItem, user_usage: u32) -> Result<usize> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Enqueue { item, user_usage, reply })
            .await
            .map_err(|_| AppError::Internal("display scheduler is not running".into()))?;
        rx.await
            .map_err(|_| AppError::Internal("display scheduler dropped the request".into()))
    }

    pub async fn snapshot(&self) -> Result<DisplaySnapshot> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| AppError::Internal("display scheduler is not running".into()))?;
        rx.await
            .map_err(|_| AppError::Internal("display scheduler dropped the request".into()))
    }
}

/// Spawn the scheduler task. It runs until every handle is dropped.
pub fn spawn(gateway: Arc<dyn BroadcastGateway>) -> SchedulerHandle {
    let (tx, rx) = mpsc::channel(64);
    tokio::spawn(run(rx, gateway));
    SchedulerHandle { tx }
}

/// Where the rotation currently stands. `Pacing` is the window between a
/// finished countdown and the next promotion: the slot looks empty from the
/// outside, but an enqueue must not promote — the pending pacing sleep will.
enum Phase {
    Idle,
    Showing { item: GossipItem, remaining: u32 },
    Pacing,
}

struct SchedulerCore {
    queue: VecDeque<GossipItem>,
    phase: Phase,
}

/// What a countdown tick did.
enum Tick {
    /// Still counting; carries the broadcast to send.
    Counting(BroadcastEvent),
    /// Hit zero: the item was discarded and the pacing gap begins.
    Finished(BroadcastEvent),
}

impl SchedulerCore {
    fn new() -> Self {
        Self { queue: VecDeque::new(), phase: Phase::Idle }
    }

    fn is_idle(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    fn is_showing(&self) -> bool {
        matches!(self.phase, Phase::Showing { .. })
    }

    /// Push an item; returns the queue length including it.
    fn enqueue(&mut self, item: GossipItem) -> usize {
        self.queue.push_back(item);
        self.queue.len()
    }

    /// Move the next queued item into the slot, or fall back to Idle when
    /// the queue is empty. Returns the `gossip-display` broadcast either way.
    fn promote(&mut self) -> BroadcastEvent {
        match self.queue.pop_front() {
            Some(item) => {
                let event = BroadcastEvent::GossipDisplay {
                    gossip: Some(item.clone()),
                    time_left: DISPLAY_SECONDS,
                    queue_length: self.queue.len(),
                };
                self.phase = Phase::Showing { item, remaining: DISPLAY_SECONDS };
                event
            }
            None => {
                self.phase = Phase::Idle;
                BroadcastEvent::GossipDisplay { gossip: None, time_left: 0, queue_length: 0 }
            }
        }
    }

    /// One second elapsed on the active countdown. Only legal while Showing.
    fn tick(&mut self) -> Option<Tick> {
        let Phase::Showing { item, remaining } = &mut self.phase else {
            return None;
        };
        *remaining -= 1;
        let event = BroadcastEvent::Countdown { time_left: *remaining, gossip: item.clone() };
        if *remaining == 0 {
            // the item is discarded here; nothing holds it after display ends
            self.phase = Phase::Pacing;
            Some(Tick::Finished(event))
        } else {
            Some(Tick::Counting(event))
        }
    }

    fn snapshot(&self) -> DisplaySnapshot {
        let state = match &self.phase {
            Phase::Showing { item, remaining } => {
                DisplayState::Showing { item: item.clone(), remaining: *remaining }
            }
            Phase::Idle | Phase::Pacing => DisplayState::Idle,
        };
        DisplaySnapshot { state, queue_length: self.queue.len() }
    }
}

async fn run(mut rx: mpsc::Receiver<Command>, gateway: Arc<dyn BroadcastGateway>) {
    let mut core = SchedulerCore::new();
    // Next timer event: a countdown tick while Showing, the gap end while
    // Pacing, absent while Idle.
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            maybe_cmd = rx.recv() => {
                let Some(cmd) = maybe_cmd else {
                    log::info!("all scheduler handles dropped; display rotation stopping");
                    break;
                };
                match cmd {
                    Command::Enqueue { item, user_usage, reply } => {
                        let position = core.enqueue(item);
                        gateway.publish(BroadcastEvent::NewGossip {
                            queue_length: position,
                            user_usage,
                        });
                        let _ = reply.send(position);
                        if core.is_idle() {
                            gateway.publish(core.promote());
                            deadline = Some(Instant::now() + TICK_INTERVAL);
                        }
                    }
                    Command::Snapshot { reply } => {
                        let _ = reply.send(core.snapshot());
                    }
                }
            }
            _ = maybe_sleep(deadline), if deadline.is_some() => {
                if let Some(fired) = deadline {
                    deadline = step_timer(&mut core, &gateway, fired);
                }
            }
        }
    }
}

/// Advance the rotation when its timer fires at `fired`; returns the next
/// deadline. Deadlines chain off the previous one so ticks do not drift.
fn step_timer(
    core: &mut SchedulerCore,
    gateway: &Arc<dyn BroadcastGateway>,
    fired: Instant,
) -> Option<Instant> {
    match core.tick() {
        Some(Tick::Counting(event)) => {
            gateway.publish(event);
            Some(fired + TICK_INTERVAL)
        }
        Some(Tick::Finished(event)) => {
            gateway.publish(event);
            Some(fired + PACING_DELAY)
        }
        // Not showing: the pacing gap just ended, promote the next item.
        None => {
            gateway.publish(core.promote());
            core.is_showing().then(|| fired + TICK_INTERVAL)
        }
    }
}

async fn maybe_sleep(deadline: Option<Instant>) {
    match deadline {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
