//! Fixed-room chat relay.
//!
//! Every subscriber of the room receives every message, its sender included.
//! There is no game logic and no token here.

use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, instrument, warn};

/// Messages buffered per subscriber before it starts lagging.
const ROOM_CAPACITY: usize = 256;

/// A chat line, inbound and outbound alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Any JSON value, relayed unchanged.
    pub message: Value,
}

/// The single chat room shared by every chat connection.
#[derive(Debug, Clone)]
pub struct ChatRoom {
    tx: broadcast::Sender<ChatMessage>,
}

impl ChatRoom {
    /// Creates an empty room.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(ROOM_CAPACITY);
        Self { tx }
    }

    /// Publishes a message to all current subscribers.
    pub fn publish(&self, message: ChatMessage) {
        // No subscribers is not an error.
        let receivers = self.tx.send(message).unwrap_or(0);
        debug!(receivers, "Chat message relayed");
    }

    /// Subscribes to messages published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatMessage> {
        self.tx.subscribe()
    }
}

impl Default for ChatRoom {
    fn default() -> Self {
        Self::new()
    }
}

/// Relays one chat connection until its inbound stream ends.
///
/// Frames that are not a JSON object with a `message` key are ignored.
#[instrument(skip_all)]
pub async fn relay<S>(room: ChatRoom, mut inbound: S, outbound: mpsc::UnboundedSender<ChatMessage>)
where
    S: Stream<Item = String> + Unpin,
{
    let mut rx = room.subscribe();
    let forward = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(message) => {
                    if outbound.send(message).is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Chat subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    while let Some(text) = inbound.next().await {
        match serde_json::from_str::<ChatMessage>(&text) {
            Ok(message) => room.publish(message),
            Err(e) => debug!(error = %e, "Ignoring chat frame"),
        }
    }

    forward.abort();
}
