use std::sync::Arc;

use serenity::model::gateway::GatewayIntents;
use tracing::info;

use crate::clients::google_calendar::{CalendarClient, GoogleCalendarClient};
use crate::config::{Profile, Settings};
use crate::events::queue::Outbox;
use crate::events::worker::run_outbox_worker;
use crate::handlers::discord::BotHandler;
use crate::handlers::message_sender::{DiscordSender, MessageSender};
use crate::service::date_range::DateRangeResolver;
use crate::service::dispatcher::CommandDispatcher;
use crate::service::quote_book::QuoteBook;
use crate::tasks::morning_loop;
use crate::tasks::reminder_loop;
use crate::tasks::task_runner::TaskRunner;

const OUTBOX_CAPACITY: usize = 10;

pub fn build_dispatcher(settings: &Settings, profile: Arc<Profile>) -> Arc<CommandDispatcher> {
    let quotes = Arc::new(QuoteBook::load(&settings.quote_file));
    info!(count = quotes.len(), "quotes loaded");
    Arc::new(CommandDispatcher::new(
        profile,
        DateRangeResolver::new(settings.timezone),
        quotes,
    ))
}

pub async fn run_api(
    settings: Settings,
    profile: Profile,
    discord_token: String,
) -> Result<(), serenity::Error> {
    let tz = settings.timezone;
    let profile = Arc::new(profile);
    let calendar: Arc<dyn CalendarClient> =
        Arc::new(GoogleCalendarClient::new(settings.calendar_auth.clone()));
    let sender: Arc<dyn MessageSender> = Arc::new(DiscordSender::new(&discord_token));
    let (outbox, rx) = Outbox::new(OUTBOX_CAPACITY);

    let mut task_runner = TaskRunner::new();
    task_runner.add_task("outbox", move || {
        tokio::spawn(run_outbox_worker(rx, sender));
    });
    task_runner.add_task("morning digest", {
        let calendar = calendar.clone();
        let profile = profile.clone();
        let outbox = outbox.clone();
        move || {
            tokio::spawn(morning_loop::run_morning_loop(calendar, profile, outbox, tz));
        }
    });
    task_runner.add_task("event reminders", {
        let calendar = calendar.clone();
        let profile = profile.clone();
        let outbox = outbox.clone();
        move || {
            tokio::spawn(reminder_loop::run_reminder_loop(calendar, profile, outbox, tz));
        }
    });
    task_runner.start_all();

    let dispatcher = build_dispatcher(&settings, profile);
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = serenity::Client::builder(&discord_token, intents)
        .event_handler(BotHandler::new(dispatcher, calendar, outbox))
        .await?;

    info!(team = %settings.team, timezone = %tz, "starting discord client");
    client.start().await
}
