//! gossip-board/crates/gb-engine/src/lib.rs
//!
//! The service layer: submission gatekeeping and the display rotation.
//! Everything here is transport-agnostic — events leave through the
//! `BroadcastGateway` port and HTTP lives one crate up in `gb-api`.

pub mod policy;
pub mod quota;
pub mod moderation;
pub mod scheduler;
pub mod pipeline;
pub mod tasks;

pub use pipeline::{Accepted, SubmissionPipeline};
pub use policy::ContentPolicy;
pub use quota::QuotaTracker;
pub use moderation::ModerationLedger;
pub use scheduler::{DisplaySnapshot, SchedulerHandle};
