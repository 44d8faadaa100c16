//! Periodic maintenance: the daily quota reset at local midnight and the
//! report retention pass. Both are plain background tasks over the same
//! internally synchronized structures the request path uses.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use tokio::task::JoinHandle;

use crate::moderation::{ModerationLedger, RETENTION_DAYS};
use crate::quota::{next_reset, QuotaTracker};

const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Wall-clock gap from `now` to the next local midnight.
pub fn until_next_midnight(now: DateTime<Local>) -> Duration {
    (next_reset(now) - now).to_std().unwrap_or(DAY)
}

/// Clears every device counter at the next local midnight and every 24h
/// after. The reset is a hard one: all devices at once, mid-window or not.
pub fn spawn_daily_reset(quota: Arc<QuotaTracker>) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(until_next_midnight(Local::now())).await;
        loop {
            quota.reset_all();
            log::info!("daily quota reset: all device counters cleared");
            tokio::time::sleep(DAY).await;
        }
    })
}

/// Once a day, drops reports older than the retention window.
pub fn spawn_report_pruning(ledger: Arc<ModerationLedger>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(DAY).await;
            ledger.prune_older_than(RETENTION_DAYS, Utc::now());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_until_next_midnight_is_under_a_day() {
        let gap = until_next_midnight(Local::now());
        assert!(gap > Duration::ZERO);
        assert!(gap <= DAY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_task_clears_counters_at_midnight() {
        let quota = Arc::new(QuotaTracker::default());
        quota.try_record("d1").unwrap();
        let task = spawn_daily_reset(quota.clone());

        // just short of midnight nothing has happened yet
        let gap = until_next_midnight(Local::now());
        tokio::time::sleep(gap + Duration::from_secs(1)).await;
        assert_eq!(quota.usage("d1"), 0);

        // counters accumulate again and clear on the following cycle
        quota.try_record("d1").unwrap();
        tokio::time::sleep(DAY).await;
        assert_eq!(quota.usage("d1"), 0);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_pruning_task_runs_daily() {
        let ledger = Arc::new(ModerationLedger::new());
        ledger.file_report("내용", "기타", "d1", None).unwrap();
        let task = spawn_report_pruning(ledger.clone());

        // fresh reports survive the daily pass
        tokio::time::sleep(DAY + Duration::from_secs(1)).await;
        assert_eq!(ledger.stats().total, 1);
        task.abort();
    }
}
