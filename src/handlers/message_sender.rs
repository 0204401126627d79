use std::num::NonZeroU64;

use serenity::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;

#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), String>;
}

pub struct DiscordSender {
    http: Http,
}

impl DiscordSender {
    pub fn new(token: &str) -> Self {
        Self {
            http: Http::new(token),
        }
    }
}

#[async_trait]
impl MessageSender for DiscordSender {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), String> {
        let channel = channel_id
            .parse::<NonZeroU64>()
            .map(ChannelId::from)
            .map_err(|_| format!("Failed to parse channel id {channel_id}"))?;
        channel
            .say(&self.http, content)
            .await
            .map_err(|e| format!("Error sending message: {:?}", e))?;
        Ok(())
    }
}

/// Prints messages instead of sending them; used by the command line.
pub struct StdoutSender;

#[async_trait]
impl MessageSender for StdoutSender {
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), String> {
        println!("[{channel_id}] {content}");
        Ok(())
    }
}
