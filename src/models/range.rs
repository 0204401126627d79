use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

/// Half-open `[start, end)` interval in the configured zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl TimeRange {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> Self {
        Self { start, end }
    }

    /// `days` whole civil days starting at local midnight of `first`.
    pub fn days(tz: &Tz, first: NaiveDate, days: i64) -> Self {
        let last = first + Duration::days(days);
        Self {
            start: local_midnight(tz, first),
            end: local_midnight(tz, last),
        }
    }
}

/// Midnight of `date` in `tz`. Ambiguous midnights take the earlier instant;
/// a midnight skipped by a DST jump becomes the first instant after the gap.
pub fn local_midnight(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    local_at(tz, date, NaiveTime::MIN)
}

const GAP_SEARCH_MINUTES: i64 = 24 * 60;

/// `time` on `date` in `tz`. Wall times inside a DST gap move forward to the
/// first wall time that exists.
pub fn local_at(tz: &Tz, date: NaiveDate, time: NaiveTime) -> DateTime<Tz> {
    let wall = date.and_time(time);
    let mut candidate = wall;
    for _ in 0..GAP_SEARCH_MINUTES {
        if let Some(instant) = tz.from_local_datetime(&candidate).earliest() {
            return instant;
        }
        candidate += Duration::minutes(1);
    }
    tz.from_utc_datetime(&wall)
}
