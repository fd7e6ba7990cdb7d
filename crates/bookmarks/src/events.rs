//! Change notifications for the rendering layer.

use tokio::sync::broadcast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEvent {
    /// The index was rebuilt from a fresh tree.
    Loaded { total: usize },
    TitleUpdated { id: String },
    Removed { id: String },
    /// The active query changed.
    FilterChanged { query: String, matched: usize },
}

#[derive(Debug, Clone)]
pub struct IndexEvents {
    sender: broadcast::Sender<IndexEvent>,
}

impl IndexEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IndexEvent> {
        self.sender.subscribe()
    }

    /// Publishes `event`, returning how many subscribers received it.
    ///
    /// Having nobody listening is fine.
    pub fn publish(&self, event: IndexEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(broadcast::error::SendError(event)) => {
                tracing::trace!(?event, "index event dropped, no subscribers");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::{timeout, Duration};

    #[tokio::test]
    async fn publish_and_receive_event() {
        let events = IndexEvents::new(8);
        let mut rx = events.subscribe();

        assert_eq!(events.publish(IndexEvent::Loaded { total: 3 }), 1);

        let received = timeout(Duration::from_millis(100), rx.recv())
            .await
            .expect("timeout")
            .expect("recv");
        assert_eq!(received, IndexEvent::Loaded { total: 3 });
    }

    #[test]
    fn publish_without_subscribers_is_not_an_error() {
        let events = IndexEvents::new(8);
        assert_eq!(
            events.publish(IndexEvent::Removed {
                id: "1".to_string()
            }),
            0
        );
    }
}
