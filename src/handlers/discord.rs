use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::clients::google_calendar::CalendarClient;
use crate::events::queue::Outbox;
use crate::service::dispatcher::{CommandDispatcher, Reply};
use crate::service::event_formatter::EventTableFormatter;
use crate::service::event_lookup::render_events_reply;

const RESTART_GRACE: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Followup {
    Continue,
    Restart,
}

pub struct BotHandler {
    dispatcher: Arc<CommandDispatcher>,
    calendar: Arc<dyn CalendarClient>,
    formatter: EventTableFormatter,
    outbox: Outbox,
}

impl BotHandler {
    pub fn new(
        dispatcher: Arc<CommandDispatcher>,
        calendar: Arc<dyn CalendarClient>,
        outbox: Outbox,
    ) -> Self {
        let formatter = EventTableFormatter::new(*dispatcher.timezone());
        BotHandler {
            dispatcher,
            calendar,
            formatter,
            outbox,
        }
    }

    /// Answers every command in `text` through the outbox.
    pub async fn handle_text(
        &self,
        text: &str,
        user_id: &str,
        channel_id: &str,
        now: DateTime<Tz>,
    ) -> Followup {
        let mut followup = Followup::Continue;
        for reply in self.dispatcher.dispatch(text, user_id, now) {
            match reply {
                Reply::Text(body) => self.outbox.emit(channel_id, body).await,
                Reply::Events(query) => {
                    let body =
                        render_events_reply(self.calendar.as_ref(), &self.formatter, &query).await;
                    self.outbox.emit(channel_id, body).await;
                }
                Reply::Restart(body) => {
                    self.outbox.emit(channel_id, body).await;
                    followup = Followup::Restart;
                }
            }
        }
        followup
    }
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "connected to discord");
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let now = Utc::now().with_timezone(self.dispatcher.timezone());
        let followup = self
            .handle_text(
                &msg.content,
                &msg.author.id.to_string(),
                &msg.channel_id.to_string(),
                now,
            )
            .await;
        if followup == Followup::Restart {
            warn!(user_id = %msg.author.id, "restart requested, exiting");
            sleep(RESTART_GRACE).await;
            std::process::exit(1);
        }
    }
}
