use tracing::warn;

use crate::clients::google_calendar::CalendarClient;
use crate::models::event::CalendarEvent;
use crate::models::range::TimeRange;
use crate::service::dispatcher::{EventsQuery, NO_EVENTS_REPLY};
use crate::service::event_formatter::EventTableFormatter;

/// Events from every calendar in `calendar_ids`. A calendar that fails is
/// logged and left out.
pub async fn collect_events<C: CalendarClient + ?Sized>(
    client: &C,
    calendar_ids: &[String],
    range: &TimeRange,
) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    for calendar_id in calendar_ids {
        match client.fetch_events(calendar_id, range).await {
            Ok(found) => events.extend(found),
            Err(err) => warn!(calendar_id = %calendar_id, error = %err, "failed to fetch calendar events"),
        }
    }
    events
}

/// Reply text for an `^events` lookup.
pub async fn render_events_reply<C: CalendarClient + ?Sized>(
    client: &C,
    formatter: &EventTableFormatter,
    query: &EventsQuery,
) -> String {
    let events = collect_events(client, &query.calendar_ids, &query.range).await;
    let table = formatter.format(&events);
    if table.is_empty() {
        NO_EVENTS_REPLY.to_string()
    } else {
        table
    }
}
