use chrono_tz::Tz;

use crate::models::event::CalendarEvent;

const FENCE: &str = "```";
const STAMP_FORMAT: &str = "%b %e %H:%M";
const MAX_CELL: usize = 30;
const TRUNCATED_CELL: usize = 27;

/// Renders calendar events as a monospaced table for chat.
pub struct EventTableFormatter {
    tz: Tz,
}

struct Row {
    start: String,
    end: String,
    title: String,
    location: String,
}

impl EventTableFormatter {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Empty string when nothing is left to show.
    pub fn format(&self, events: &[CalendarEvent]) -> String {
        let mut active: Vec<&CalendarEvent> = events.iter().filter(|e| !e.is_cancelled()).collect();
        self.sort_by_start_before_end(&mut active);

        let rows: Vec<Row> = active
            .iter()
            .filter_map(|event| {
                let title = event.summary.as_deref()?;
                Some(Row {
                    start: event.start.instant(&self.tz).format(STAMP_FORMAT).to_string(),
                    end: event.end.instant(&self.tz).format(STAMP_FORMAT).to_string(),
                    title: truncate_cell(title),
                    location: truncate_cell(event.location.as_deref().unwrap_or("")),
                })
            })
            .collect();
        if rows.is_empty() {
            return String::new();
        }

        let title_width = rows.iter().map(|r| r.title.chars().count()).max().unwrap_or(0);
        let location_width = rows.iter().map(|r| r.location.chars().count()).max().unwrap_or(0);

        let mut header = format!(
            " Start        | End          | Event{}",
            " ".repeat(title_width.saturating_sub(4).max(1))
        );
        if location_width > 0 {
            header.push_str("| Location");
        }

        let mut reply = format!("{FENCE}{header}\n{}\n", "-".repeat(header.chars().count()));
        let title_width = title_width.max(1);
        for row in &rows {
            reply.push_str(&format!(
                " {:<12} | {:<12} | {:<title_width$}",
                row.start, row.end, row.title
            ));
            if location_width > 0 {
                reply.push_str(&format!(" | {:<location_width$}", row.location));
            }
            reply.push('\n');
        }
        reply.push_str(FENCE);
        reply
    }

    /// Orders by "this event starts before that one ends". The predicate is
    /// not a total order, so a plain insertion sort applies it directly; it
    /// never panics and gives the same order for the same input.
    fn sort_by_start_before_end(&self, events: &mut [&CalendarEvent]) {
        let less = |a: &CalendarEvent, b: &CalendarEvent| {
            a.start.instant(&self.tz) < b.end.instant(&self.tz)
        };
        for i in 1..events.len() {
            let mut j = i;
            while j > 0 && less(events[j], events[j - 1]) {
                events.swap(j, j - 1);
                j -= 1;
            }
        }
    }
}

fn truncate_cell(text: &str) -> String {
    if text.chars().count() > MAX_CELL {
        let head: String = text.chars().take(TRUNCATED_CELL).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
