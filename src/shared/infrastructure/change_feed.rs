// Change notifications from the backing store.
//
// Purpose
// - Fan out "something changed in table X" to whoever keeps a local copy.
//
// Boundaries
// - Events carry no row data. Consumers re-fetch instead of merging.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

const FEED_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: String,
    #[serde(rename = "type")]
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(table: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            table: table.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self { sender }
    }

    /// Returns how many subscribers saw the event. Zero is not an error.
    pub fn publish(&self, event: ChangeEvent) -> usize {
        tracing::debug!(table = %event.table, kind = ?event.kind, "change published");
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod change_feed_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_deliver_published_events_to_subscribers() {
        let feed = ChangeFeed::new();
        let mut receiver = feed.subscribe();
        let delivered = feed.publish(ChangeEvent::new("habit", ChangeKind::Insert));
        assert_eq!(delivered, 1);
        let event = receiver.recv().await.unwrap();
        assert_eq!(event, ChangeEvent::new("habit", ChangeKind::Insert));
    }

    #[rstest]
    fn it_should_not_fail_without_subscribers() {
        let feed = ChangeFeed::new();
        assert_eq!(
            feed.publish(ChangeEvent::new("habitRecords", ChangeKind::Delete)),
            0
        );
    }

    #[rstest]
    fn it_should_read_webhook_payloads() {
        let event: ChangeEvent =
            serde_json::from_str(r#"{"table":"habitRecords","type":"UPDATE"}"#).unwrap();
        assert_eq!(event.kind, ChangeKind::Update);
        assert_eq!(event.table, "habitRecords");
    }
}
