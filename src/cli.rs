use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand};
use inquire::Text;
use tokio::task::JoinHandle;

use crate::clients::google_calendar::{CalendarClient, GoogleCalendarClient};
use crate::config::{Profile, Settings};
use crate::events::queue::Outbox;
use crate::events::worker::run_outbox_worker;
use crate::handlers::discord::{BotHandler, Followup};
use crate::handlers::message_sender::StdoutSender;
use crate::runtime::build_dispatcher;
use crate::service::date_range::DateRangeResolver;

const LOCAL_USER: &str = "cli";
const LOCAL_CHANNEL: &str = "local";

#[derive(Parser)]
#[command(name = "calBot", about = "Calendar bot: date ranges, event tables, notifications")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the interval a range phrase resolves to.
    Resolve { phrase: Vec<String> },
    /// Print the event table the bot would post for a range phrase.
    Events { phrase: Vec<String> },
    /// Type chat messages and read the bot's replies.
    Prompt {},
}

pub async fn cli(settings: Settings, profile: Profile) {
    // Fine to exit on bad arguments here
    let cli = Cli::parse();
    let now = Utc::now().with_timezone(&settings.timezone);
    match cli.command {
        Commands::Resolve { phrase } => {
            let resolver = DateRangeResolver::new(settings.timezone);
            println!("{}", describe_range(&resolver, &phrase.join(" "), now));
        }
        Commands::Events { phrase } => {
            let (handler, worker) = local_bot(&settings, profile);
            let message = format!("^events {}", phrase.join(" "));
            handler.handle_text(&message, LOCAL_USER, LOCAL_CHANNEL, now).await;
            drop(handler);
            let _ = worker.await;
        }
        Commands::Prompt {} => {
            let (handler, worker) = local_bot(&settings, profile);
            while let Ok(text) = Text::new("Message:").prompt() {
                if text.trim().is_empty() {
                    break;
                }
                let now = Utc::now().with_timezone(&settings.timezone);
                let followup = handler.handle_text(&text, LOCAL_USER, LOCAL_CHANNEL, now).await;
                if followup == Followup::Restart {
                    println!("(restart requested; ignored on the command line)");
                }
            }
            drop(handler);
            let _ = worker.await;
        }
    }
}

pub fn describe_range(resolver: &DateRangeResolver, phrase: &str, now: DateTime<Tz>) -> String {
    match resolver.resolve(phrase, now) {
        Ok(range) => format!(
            "start: {}\nend:   {}",
            range.start.to_rfc3339(),
            range.end.to_rfc3339()
        ),
        Err(err) => err.to_string(),
    }
}

fn local_bot(settings: &Settings, profile: Profile) -> (BotHandler, JoinHandle<()>) {
    let dispatcher = build_dispatcher(settings, Arc::new(profile));
    let calendar: Arc<dyn CalendarClient> =
        Arc::new(GoogleCalendarClient::new(settings.calendar_auth.clone()));
    let (outbox, rx) = Outbox::new(16);
    let worker = tokio::spawn(run_outbox_worker(rx, Arc::new(StdoutSender)));
    (BotHandler::new(dispatcher, calendar, outbox), worker)
}
