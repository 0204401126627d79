//! Turns informal range phrases into concrete `[start, end)` intervals.
//!
//! Recognised forms, first match wins:
//!
//! | phrase                 | range                              |
//! |------------------------|------------------------------------|
//! | blank                  | today, seven days                  |
//! | `today`                | today                              |
//! | `tomorrow`             | tomorrow                           |
//! | `3/15/24`, `3-15 2024` | that day (month first)             |
//! | `10/12`                | that day in the current year       |
//! | `fall 24 week 3 wed`   | that day of the term week          |
//! | `wk 2`, `fri wk2`      | week (or day) of the current term  |
//! | `week 3 fall`          | week of the named term             |

use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{DateParseError, DateParseReason};
use crate::models::range::TimeRange;
use crate::models::term::{parse_weekday, parse_weekday_word, Term};
use crate::service::term_calendar::{date_of, term_week_of};

static NUMERIC_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[-/ ](\d{1,2})(?:[-/ ](\d{4}|\d{2}))?$")
        .expect("numeric date pattern compiles")
});

static TERM_WEEK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:(?P<lead>[a-z]+)\s*(?P<year>\d{4}|\d{2})?\s*)?w(?:ee)?k\s*(?P<week>\d{1,2})(?:\s*(?P<day>[a-z]+))?$",
    )
    .expect("term week pattern compiles")
});

type RuleResult = Option<Result<TimeRange, DateParseError>>;
type Rule = fn(&RangeQuery<'_>) -> RuleResult;

/// Evaluated in order; a rule answers `None` when the phrase is not its shape.
const RULES: &[(&str, Rule)] = &[
    ("blank", blank_week),
    ("today", today),
    ("tomorrow", tomorrow),
    ("numeric date", numeric_date),
    ("term week", term_week),
];

struct RangeQuery<'a> {
    text: &'a str,
    today: NaiveDate,
    tz: &'a Tz,
}

impl RangeQuery<'_> {
    fn day(&self, date: NaiveDate) -> TimeRange {
        TimeRange::days(self.tz, date, 1)
    }

    fn fail(&self, reason: DateParseReason) -> DateParseError {
        DateParseError::new(self.text, reason)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DateRangeResolver {
    tz: Tz,
}

impl DateRangeResolver {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn resolve(&self, text: &str, now: DateTime<Tz>) -> Result<TimeRange, DateParseError> {
        let query = RangeQuery {
            text,
            today: now.with_timezone(&self.tz).date_naive(),
            tz: &self.tz,
        };
        for (name, rule) in RULES {
            if let Some(result) = rule(&query) {
                debug!(rule = *name, input = text, ok = result.is_ok(), "range rule matched");
                return result;
            }
        }
        Err(query.fail(DateParseReason::InvalidDateFormat))
    }
}

fn blank_week(query: &RangeQuery<'_>) -> RuleResult {
    if !query.text.trim().is_empty() {
        return None;
    }
    Some(Ok(TimeRange::days(query.tz, query.today, 7)))
}

fn today(query: &RangeQuery<'_>) -> RuleResult {
    (query.text == "today").then(|| Ok(query.day(query.today)))
}

fn tomorrow(query: &RangeQuery<'_>) -> RuleResult {
    let next = query.today.succ_opt()?;
    (query.text == "tomorrow").then(|| Ok(query.day(next)))
}

fn numeric_date(query: &RangeQuery<'_>) -> RuleResult {
    let caps = NUMERIC_DATE.captures(query.text.trim())?;
    let month = number(&caps, 1);
    let day = number(&caps, 2);
    let year = match caps.get(3) {
        Some(year) => full_year(year.as_str()),
        None => Some(query.today.year()),
    };
    let date = match (month, day, year) {
        (Some(m), Some(d), Some(y)) => NaiveDate::from_ymd_opt(y, m as u32, d as u32),
        _ => None,
    };
    Some(
        date.map(|date| query.day(date))
            .ok_or_else(|| query.fail(DateParseReason::InvalidDateFormat)),
    )
}

fn term_week(query: &RangeQuery<'_>) -> RuleResult {
    let caps = TERM_WEEK.captures(query.text.trim())?;
    Some(resolve_term_week(query, &caps))
}

fn resolve_term_week(
    query: &RangeQuery<'_>,
    caps: &Captures<'_>,
) -> Result<TimeRange, DateParseError> {
    let invalid_format = || query.fail(DateParseReason::InvalidDateFormat);

    let (current_term, _) = term_week_of(query.today).ok_or_else(invalid_format)?;
    let mut term = current_term;
    let mut weekday: Option<Weekday> = None;
    let mut year = query.today.year();

    if let Some(lead) = caps.name("lead") {
        let lead = lead.as_str();
        if let Some(named) = Term::from_name(lead) {
            term = named;
        } else if let Some(day) = parse_weekday_word(lead) {
            weekday = Some(day);
        } else {
            return Err(query.fail(DateParseReason::InvalidTerm));
        }
    }
    if let Some(lead_year) = caps.name("year") {
        year = full_year(lead_year.as_str()).ok_or_else(invalid_format)?;
    }

    let week = caps
        .name("week")
        .and_then(|w| w.as_str().parse::<i64>().ok())
        .ok_or_else(invalid_format)?;

    // "week 3 fall" names the term after the week.
    if let Some(token) = caps.name("day") {
        let token = token.as_str();
        match (Term::from_name(token), caps.name("lead")) {
            (Some(named), None) => term = named,
            _ => {
                let day = parse_weekday(token)
                    .ok_or_else(|| DateParseError::new(token, DateParseReason::InvalidWeekday))?;
                weekday = Some(day);
            }
        }
    }

    match weekday {
        Some(day) => {
            let date = date_of(year, term, week, day).ok_or_else(invalid_format)?;
            Ok(TimeRange::days(query.tz, date, 1))
        }
        None => {
            let monday = date_of(year, term, week, Weekday::Mon).ok_or_else(invalid_format)?;
            Ok(TimeRange::days(query.tz, monday, 7))
        }
    }
}

fn number(caps: &Captures<'_>, idx: usize) -> Option<i32> {
    caps.get(idx)?.as_str().parse().ok()
}

/// Two-digit years land in the 2000s; four-digit years are taken as written.
fn full_year(text: &str) -> Option<i32> {
    let year: i32 = text.parse().ok()?;
    if text.len() <= 2 {
        Some(2000 + year)
    } else {
        Some(year)
    }
}
