//! Server-wide chat.
//!
//! Sessions announce joins and leaves, and players' chat lines, through a
//! [`ChatSink`]. [`GlobalChat`] fans every announcement out to subscribers
//! (one per connected player) and writes it to the log.

use hearth_proto::format::strip_formatting;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

/// Destination for server-wide announcements.
pub trait ChatSink: Send + Sync {
    fn announce(&self, text: &str);
}

/// Broadcast chat shared by every session of the server.
#[derive(Clone)]
pub struct GlobalChat {
    tx: broadcast::Sender<Arc<str>>,
}

impl GlobalChat {
    /// Create a chat whose subscribers may lag at most `capacity` messages
    /// behind before missing some.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Receive every announcement made from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<str>> {
        self.tx.subscribe()
    }
}

impl ChatSink for GlobalChat {
    fn announce(&self, text: &str) {
        info!(target: "chat", "{}", strip_formatting(text));
        // No subscribers simply means nobody is online.
        let _ = self.tx.send(Arc::from(text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_announcements() {
        let chat = GlobalChat::new(8);
        let mut a = chat.subscribe();
        let mut b = chat.subscribe();

        chat.announce("hello");

        assert_eq!(&*a.recv().await.unwrap(), "hello");
        assert_eq!(&*b.recv().await.unwrap(), "hello");
    }

    #[test]
    fn test_announce_without_subscribers() {
        GlobalChat::new(1).announce("nobody listening");
    }
}
