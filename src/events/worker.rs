use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::events::queue::OutboundMessage;
use crate::handlers::message_sender::MessageSender;

/// Sends queued messages until every [`Outbox`](crate::events::queue::Outbox)
/// handle is dropped.
pub async fn run_outbox_worker(
    mut rx: mpsc::Receiver<OutboundMessage>,
    sender: Arc<dyn MessageSender>,
) {
    while let Some(message) = rx.recv().await {
        info!(channel_id = %message.channel_id, "sending message");
        if let Err(err) = sender
            .send_message(&message.channel_id, &message.content)
            .await
        {
            warn!(channel_id = %message.channel_id, error = %err, "failed to send message");
        }
    }
}
