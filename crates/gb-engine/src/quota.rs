//! # QuotaTracker
//!
//! Per-device daily submission counters. The map carries no day component:
//! a background task hard-resets every counter at local midnight, so the
//! live map always describes "today". A device's quota therefore resets at
//! midnight regardless of when its first submission happened.

use chrono::{DateTime, Duration as ChronoDuration, Local};
use dashmap::DashMap;

use gb_core::{AppError, Result};

/// Accepted submissions allowed per device per calendar day.
pub const DAILY_LIMIT: u32 = 3;

pub struct QuotaTracker {
    counts: DashMap<String, u32>,
    limit: u32,
}

impl QuotaTracker {
    pub fn new(limit: u32) -> Self {
        Self { counts: DashMap::new(), limit }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Today's accepted-submission count for `device_id`.
    pub fn usage(&self, device_id: &str) -> u32 {
        self.counts.get(device_id).map(|c| *c).unwrap_or(0)
    }

    /// Cheap gate check — never mutates. The counter moves exclusively via
    /// [`try_record`](Self::try_record), which the pipeline calls on
    /// acceptance, so a rejected submission can never consume quota.
    pub fn check(&self, device_id: &str) -> Result<()> {
        if self.usage(device_id) >= self.limit {
            return Err(AppError::QuotaExceeded);
        }
        Ok(())
    }

    /// Reserve one accepted submission and return the new usage. The limit
    /// check and the increment share one entry lock: concurrent submissions
    /// from the same device serialize here and can never overshoot the
    /// daily limit, whatever `check` said a moment earlier.
    pub fn try_record(&self, device_id: &str) -> Result<u32> {
        let mut entry = self.counts.entry(device_id.to_string()).or_insert(0);
        if *entry >= self.limit {
            return Err(AppError::QuotaExceeded);
        }
        *entry += 1;
        Ok(*entry)
    }

    /// Hand back a reservation whose submission never became an accepted
    /// item (the enqueue failed after the reserve).
    pub fn release(&self, device_id: &str) {
        if let Some(mut count) = self.counts.get_mut(device_id) {
            *count = count.saturating_sub(1);
        }
    }

    /// Hard reset: every device's counter is dropped at once.
    pub fn reset_all(&self) {
        self.counts.clear();
    }

    /// Number of devices that submitted at least once today.
    pub fn active_devices(&self) -> usize {
        self.counts.len()
    }
}

impl Default for QuotaTracker {
    fn default() -> Self {
        Self::new(DAILY_LIMIT)
    }
}

/// The next local midnight — when every counter resets.
pub fn next_reset(now: DateTime<Local>) -> DateTime<Local> {
    let tomorrow = now.date_naive() + ChronoDuration::days(1);
    tomorrow
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .unwrap_or(now + ChronoDuration::days(1))
}
