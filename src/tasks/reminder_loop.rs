use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::clients::google_calendar::CalendarClient;
use crate::config::Profile;
use crate::events::queue::Outbox;
use crate::models::event::CalendarEvent;
use crate::models::range::{local_midnight, TimeRange};
use crate::service::event_lookup::collect_events;

/// Minutes before start, and how the lead reads in the message.
const REMINDER_LEADS: [(i64, &str); 2] = [(60, "1 hour"), (10, "10 minutes")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedReminder {
    pub fire_at: DateTime<Tz>,
    pub content: String,
}

pub fn reminder_message(title: &str, lead: &str) -> String {
    format!("Hey Guys! Dont forget, {title} is coming up in {lead}!:\n")
}

/// Reminders for timed, titled, live events that have not started yet.
/// A reminder whose instant already passed keeps it; the sender fires it
/// right away.
pub fn plan_reminders(events: &[CalendarEvent], now: DateTime<Tz>) -> Vec<PlannedReminder> {
    let tz = now.timezone();
    let mut planned = Vec::new();
    for event in events {
        let Some(title) = event.summary.as_deref() else {
            continue;
        };
        if event.is_cancelled() || event.start.is_all_day() {
            continue;
        }
        let start = event.start.instant(&tz);
        if start <= now {
            continue;
        }
        for (minutes, lead) in REMINDER_LEADS {
            planned.push(PlannedReminder {
                fire_at: start - Duration::minutes(minutes),
                content: reminder_message(title, lead),
            });
        }
    }
    planned.sort_by_key(|reminder| reminder.fire_at);
    planned
}

/// Local midnight that starts the day after `now`.
pub fn next_midnight(now: DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();
    local_midnight(&tz, today.succ_opt().unwrap_or(today))
}

/// Fetches today's events and schedules their reminders. Returns how many
/// reminders were scheduled.
pub async fn reminder_tick<C: CalendarClient + ?Sized>(
    client: &C,
    profile: &Profile,
    outbox: &Outbox,
    now: DateTime<Tz>,
) -> usize {
    let tz = now.timezone();
    let today = TimeRange::days(&tz, now.date_naive(), 1);
    let events = collect_events(client, std::slice::from_ref(&profile.default_calendar), &today).await;
    let planned = plan_reminders(&events, now);
    for reminder in &planned {
        let wait = (reminder.fire_at - now).to_std().unwrap_or_default();
        let outbox = outbox.clone();
        let channel = profile.default_channel.clone();
        let content = reminder.content.clone();
        debug!(fire_at = %reminder.fire_at, "reminder scheduled");
        tokio::spawn(async move {
            sleep(wait).await;
            outbox.emit(&channel, content).await;
        });
    }
    planned.len()
}

pub async fn run_reminder_loop(
    client: Arc<dyn CalendarClient>,
    profile: Arc<Profile>,
    outbox: Outbox,
    tz: Tz,
) {
    loop {
        let now = Utc::now().with_timezone(&tz);
        let scheduled = reminder_tick(client.as_ref(), &profile, &outbox, now).await;
        info!(scheduled, "event reminders scheduled for today");
        let wake = next_midnight(now);
        let wait = (wake - Utc::now().with_timezone(&tz)).to_std().unwrap_or_default();
        sleep(wait).await;
    }
}
