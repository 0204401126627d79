use chrono::{DateTime, FixedOffset, NaiveDate};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::models::range::local_midnight;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
    #[serde(other)]
    Unknown,
}

/// Start or end marker of an event: all-day events carry a `date`, timed
/// events a `dateTime`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EventTime {
    DateTime {
        #[serde(rename = "dateTime")]
        date_time: DateTime<FixedOffset>,
    },
    Date {
        date: NaiveDate,
    },
}

impl EventTime {
    pub fn instant(&self, tz: &Tz) -> DateTime<Tz> {
        match self {
            EventTime::DateTime { date_time } => date_time.with_timezone(tz),
            EventTime::Date { date } => local_midnight(tz, *date),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventTime::Date { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub status: EventStatus,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
}

impl CalendarEvent {
    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }
}
