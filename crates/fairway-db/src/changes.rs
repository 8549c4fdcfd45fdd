//! Change notifications for live queries.
//!
//! Each backend owns one [`ChangeFeed`]. Every [`EventStore`] built over
//! the same backend publishes to and subscribes from that feed, so a live
//! query sees writes made through any store sharing the backend.
//!
//! [`EventStore`]: crate::EventStore

use fairway_types::RoundId;
use tokio::sync::broadcast;

/// Capacity of the change-notification channel.
///
/// A live query that falls further behind than this re-reads once and
/// carries on; it never misses the latest state.
pub const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Broadcast of round ids whose events were written or deleted.
///
/// Clones share one channel.
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<RoundId>,
}

impl ChangeFeed {
    /// Create a feed with no subscribers.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Announce a change to `round_id`.
    pub fn notify(&self, round_id: RoundId) {
        // No live queries means no receivers; that is not an error.
        let _ = self.sender.send(round_id);
    }

    /// Receive every subsequent change.
    pub fn subscribe(&self) -> broadcast::Receiver<RoundId> {
        self.sender.subscribe()
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_one_channel() {
        let feed = ChangeFeed::new();
        let mut rx = feed.subscribe();
        feed.clone().notify(RoundId(7));
        assert_eq!(rx.recv().await.unwrap(), RoundId(7));
    }

    #[test]
    fn notify_without_subscribers_is_fine() {
        ChangeFeed::new().notify(RoundId(1));
    }
}
