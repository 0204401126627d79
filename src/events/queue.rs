use tokio::sync::mpsc;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub channel_id: String,
    pub content: String,
}

/// Replies and notifications waiting to be sent to chat.
#[derive(Clone)]
pub struct Outbox {
    tx: mpsc::Sender<OutboundMessage>,
}

impl Outbox {
    pub fn new(buffer: usize) -> (Self, mpsc::Receiver<OutboundMessage>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { tx }, rx)
    }

    pub async fn emit(&self, channel_id: &str, content: impl Into<String>) {
        let message = OutboundMessage {
            channel_id: channel_id.to_string(),
            content: content.into(),
        };
        if self.tx.send(message).await.is_err() {
            warn!(channel_id, "outbox closed, dropping message");
        }
    }
}
