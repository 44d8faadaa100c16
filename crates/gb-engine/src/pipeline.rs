//! # SubmissionPipeline
//!
//! The gate chain every submission walks before it may reach the display
//! queue: banned device → length validity → content policy → daily quota.
//! Checks fail fast and each maps to its own HTTP status at the boundary.
//! Quota is consumed only once a submission has cleared every gate.

use std::sync::Arc;

use gb_core::{AppError, GossipItem, Result};

use crate::moderation::ModerationLedger;
use crate::policy::ContentPolicy;
use crate::quota::QuotaTracker;
use crate::scheduler::SchedulerHandle;

/// Maximum content length in characters, after trimming.
pub const MAX_CONTENT_CHARS: usize = 50;

/// Outcome of an accepted submission.
#[derive(Debug, Clone, Copy)]
pub struct Accepted {
    /// Queue length right after this item was pushed.
    pub queue_position: usize,
    /// The device's usage count including this submission.
    pub usage: u32,
}

pub struct SubmissionPipeline {
    ledger: Arc<ModerationLedger>,
    quota: Arc<QuotaTracker>,
    policy: ContentPolicy,
    scheduler: SchedulerHandle,
}

impl SubmissionPipeline {
    pub fn new(
        ledger: Arc<ModerationLedger>,
        quota: Arc<QuotaTracker>,
        policy: ContentPolicy,
        scheduler: SchedulerHandle,
    ) -> Self {
        Self { ledger, quota, policy, scheduler }
    }

    /// Run the full gate chain and, on acceptance, hand the item to the
    /// display scheduler. The scheduler broadcasts `new-gossip` (and any
    /// promotion) itself, so observers always see events in causal order.
    pub async fn submit(&self, content: &str, device_id: &str) -> Result<Accepted> {
        let device_id = device_id.trim();
        if device_id.is_empty() {
            return Err(AppError::MissingField("deviceId"));
        }

        if self.ledger.is_banned(device_id) {
            log::info!("rejected submission from banned device {device_id}");
            return Err(AppError::Forbidden("device is banned".into()));
        }

        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("content must not be empty".into()));
        }
        if content.chars().count() > MAX_CONTENT_CHARS {
            return Err(AppError::Validation(format!(
                "content must be at most {MAX_CONTENT_CHARS} characters"
            )));
        }

        self.policy.evaluate(content)?;
        self.quota.check(device_id)?;

        // Past every gate: reserve quota atomically (concurrent submissions
        // from one device serialize on the reserve, not on `check`) so the
        // new-gossip broadcast can carry the usage count.
        let usage = self.quota.try_record(device_id)?;
        let item = GossipItem::new(content, device_id);
        let queue_position = match self.scheduler.enqueue(item, usage).await {
            Ok(position) => position,
            Err(err) => {
                // the item never reached the queue; hand the slot back
                self.quota.release(device_id);
                return Err(err);
            }
        };

        log::debug!("accepted gossip from {device_id}: position {queue_position}, usage {usage}");
        Ok(Accepted { queue_position, usage })
    }
}
