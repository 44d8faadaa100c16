//! gossip-board/crates/gb-core/src/lib.rs
//!
//! The central domain logic and interface definitions for Gossip-Board.

pub mod models;
pub mod events;
pub mod traits;
pub mod error;

// Re-exporting for easier access in other crates
pub use models::*;
pub use events::*;
pub use traits::*;
pub use error::*;

#[cfg(test)]
mod tests {
    use super::models::*;

    #[test]
    fn test_gossip_item_creation_v7() {
        let item = GossipItem::new("점심 메뉴 추천 좀", "device-1");
        assert_eq!(item.content, "점심 메뉴 추천 좀");
        assert_eq!(item.submitter_id, "device-1");
        assert_eq!(item.id.get_version_num(), 7);
    }

    #[test]
    fn test_display_state_active_item() {
        let idle = DisplayState::Idle;
        assert!(idle.active_item().is_none());

        let item = GossipItem::new("하나", "d");
        let showing = DisplayState::Showing { item: item.clone(), remaining: 5 };
        assert_eq!(showing.active_item().map(|i| i.id), Some(item.id));
        assert_eq!(showing.time_left(), 5);
    }
}
