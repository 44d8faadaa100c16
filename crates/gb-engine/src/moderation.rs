//! # ModerationLedger
//!
//! Report intake, severity classification, and the ban set. A severe report
//! bans its device id immediately — there is no review step and no unban
//! path; bans last for the life of the process.

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use once_cell::sync::Lazy;
use uuid::Uuid;

use gb_core::{AppError, Report, ReportStatus, Result};

/// Reports older than this are pruned by the daily maintenance pass.
pub const RETENTION_DAYS: i64 = 7;

/// Report categories that ban on sight.
static SEVERE_REASONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from(["폭력적 내용", "혐오 발언", "성적 내용", "불법 정보"])
});

/// Content fragments that mark a report severe regardless of its category.
/// Matched case-sensitively, as substrings.
const SEVERE_TERMS: &[&str] = &["죽이", "살인", "자살", "폭행", "테러"];

#[derive(Default)]
struct LedgerInner {
    /// Insertion-ordered report log.
    reports: Vec<Report>,
    banned: HashSet<String>,
}

#[derive(Default)]
pub struct ModerationLedger {
    inner: Mutex<LedgerInner>,
}

/// Aggregate counters for the admin surface.
#[derive(Debug, Clone, Copy)]
pub struct LedgerStats {
    pub total: usize,
    pub pending: usize,
    pub banned_devices: usize,
}

impl ModerationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the report's category or content puts it in the severe set.
    pub fn is_severe(content: &str, reason: &str) -> bool {
        SEVERE_REASONS.contains(reason) || SEVERE_TERMS.iter().any(|t| content.contains(t))
    }

    /// Append a Pending report and classify it immediately. A severe report
    /// adds `device_id` to the ban set before this returns.
    pub fn file_report(
        &self,
        content: &str,
        reason: &str,
        device_id: &str,
        app_version: Option<&str>,
    ) -> Result<Uuid> {
        if content.is_empty() {
            return Err(AppError::MissingField("content"));
        }
        if reason.is_empty() {
            return Err(AppError::MissingField("reason"));
        }
        if device_id.is_empty() {
            return Err(AppError::MissingField("deviceId"));
        }

        let report = Report {
            id: Uuid::now_v7(),
            content: content.to_string(),
            reason: reason.to_string(),
            reported_at: Utc::now(),
            device_id: device_id.to_string(),
            status: ReportStatus::Pending,
            app_version: app_version.map(str::to_string),
        };
        let id = report.id;
        let severe = Self::is_severe(content, reason);

        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.reports.push(report);
        if severe {
            log::warn!("severe report {id}: banning device {device_id}");
            inner.banned.insert(device_id.to_string());
        }
        Ok(id)
    }

    pub fn is_banned(&self, device_id: &str) -> bool {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.banned.contains(device_id)
    }

    /// The last `limit` reports, oldest first within the window.
    pub fn recent(&self, limit: usize) -> Vec<Report> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let skip = inner.reports.len().saturating_sub(limit);
        inner.reports[skip..].to_vec()
    }

    pub fn stats(&self) -> LedgerStats {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        LedgerStats {
            total: inner.reports.len(),
            pending: inner
                .reports
                .iter()
                .filter(|r| r.status == ReportStatus::Pending)
                .count(),
            banned_devices: inner.banned.len(),
        }
    }

    /// Drop reports older than `retention_days` as of `now`. Bans survive
    /// pruning — the ban set only ever grows.
    pub fn prune_older_than(&self, retention_days: i64, now: DateTime<Utc>) -> usize {
        let cutoff = now - ChronoDuration::days(retention_days);
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let before = inner.reports.len();
        inner.reports.retain(|r| r.reported_at >= cutoff);
        let removed = before - inner.reports.len();
        if removed > 0 {
            log::info!("pruned {removed} reports older than {retention_days} days");
        }
        removed
    }
}
