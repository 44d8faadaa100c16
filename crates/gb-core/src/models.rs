//! # Domain Models
//!
//! These structs represent the core entities of Gossip-Board.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single ephemeral broadcast message. Immutable once created; owned by the
/// display scheduler from enqueue until the countdown discards it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GossipItem {
    pub id: Uuid,
    /// Trimmed message body, 1–50 characters.
    pub content: String,
    pub created_at: DateTime<Utc>,
    /// Opaque client-supplied device identifier.
    pub submitter_id: String,
}

impl GossipItem {
    pub fn new(content: &str, submitter_id: &str) -> Self {
        Self {
            id: Uuid::now_v7(),
            content: content.to_string(),
            created_at: Utc::now(),
            submitter_id: submitter_id.to_string(),
        }
    }
}

/// The one process-wide display slot. At most one item is ever active.
#[derive(Debug, Clone)]
pub enum DisplayState {
    /// Nothing on screen and nothing counting down.
    Idle,
    /// `item` is visible to every observer; `remaining` counts down once per
    /// second until the slot is vacated.
    Showing { item: GossipItem, remaining: u32 },
}

impl DisplayState {
    pub fn active_item(&self) -> Option<&GossipItem> {
        match self {
            DisplayState::Idle => None,
            DisplayState::Showing { item, .. } => Some(item),
        }
    }

    pub fn time_left(&self) -> u32 {
        match self {
            DisplayState::Idle => 0,
            DisplayState::Showing { remaining, .. } => *remaining,
        }
    }
}

/// Review status of a filed report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Pending,
    Reviewed,
}

/// A user-filed report against broadcast content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: Uuid,
    /// The reported message text, as the reporter saw it.
    pub content: String,
    /// Client-supplied category string (Korean in production clients).
    pub reason: String,
    pub reported_at: DateTime<Utc>,
    /// Device id attached to the report; this is the id a severe report bans.
    pub device_id: String,
    pub status: ReportStatus,
    /// Optional reporting-app version, kept for triage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
}
