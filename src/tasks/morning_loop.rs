use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use tokio::time::sleep;
use tracing::info;

use crate::clients::google_calendar::CalendarClient;
use crate::config::Profile;
use crate::events::queue::Outbox;
use crate::models::event::CalendarEvent;
use crate::models::range::{local_at, TimeRange};
use crate::service::event_formatter::EventTableFormatter;
use crate::service::event_lookup::collect_events;

const MORNING_HOUR: u32 = 7;

/// Next 07:00 local strictly after `now`.
pub fn next_morning_run(now: DateTime<Tz>) -> DateTime<Tz> {
    let tz = now.timezone();
    let seven = NaiveTime::from_hms_opt(MORNING_HOUR, 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date_naive();
    let target = local_at(&tz, today, seven);
    if now < target {
        return target;
    }
    match today.succ_opt() {
        Some(tomorrow) => local_at(&tz, tomorrow, seven),
        None => target,
    }
}

pub fn build_morning_message(formatter: &EventTableFormatter, events: &[CalendarEvent]) -> String {
    let table = formatter.format(events);
    if table.is_empty() {
        "Good Morning!\nThere are no events happening today.".to_string()
    } else {
        format!("Good Morning!\nHere are the events happening today:\n{table}")
    }
}

/// Posts the digest for `day` to the profile's default channel.
pub async fn morning_tick<C: CalendarClient + ?Sized>(
    client: &C,
    formatter: &EventTableFormatter,
    profile: &Profile,
    outbox: &Outbox,
    tz: &Tz,
    day: NaiveDate,
) {
    let range = TimeRange::days(tz, day, 1);
    let events = collect_events(client, std::slice::from_ref(&profile.default_calendar), &range).await;
    info!(%day, count = events.len(), "posting morning digest");
    let message = build_morning_message(formatter, &events);
    outbox.emit(&profile.default_channel, message).await;
}

pub async fn run_morning_loop(
    client: Arc<dyn CalendarClient>,
    profile: Arc<Profile>,
    outbox: Outbox,
    tz: Tz,
) {
    let formatter = EventTableFormatter::new(tz);
    loop {
        let now = Utc::now().with_timezone(&tz);
        let wake = next_morning_run(now);
        let wait = (wake - now).to_std().unwrap_or_default();
        info!(%wake, "morning digest scheduled");
        sleep(wait).await;
        morning_tick(client.as_ref(), &formatter, &profile, &outbox, &tz, wake.date_naive()).await;
    }
}
