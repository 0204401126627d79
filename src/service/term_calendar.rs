//! Term and week arithmetic.
//!
//! A year is split into four terms by quarter (see [`Term::from_month`]).
//! Week one of a term starts two weeks after the first Monday on or after the
//! 1st of the term's first month.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::models::term::Term;

const WEEK_ONE_LEAD_DAYS: i64 = 14;

pub fn season_from_month(month: u32) -> Term {
    Term::from_month(month)
}

pub fn term_from_name(name: &str) -> Option<Term> {
    Term::from_name(name)
}

/// Monday that opens week one of `term` in `year`. `None` only for years
/// outside chrono's supported range.
pub fn week_one_monday(year: i32, term: Term) -> Option<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, term.first_month(), 1)?;
    let to_monday = (7 - i64::from(first.weekday().num_days_from_monday())) % 7;
    first.checked_add_signed(Duration::days(to_monday + WEEK_ONE_LEAD_DAYS))
}

/// Term of `date` and its week number, rounded half-up from the distance to
/// week one. Dates before week one give zero or negative weeks.
pub fn term_week_of(date: NaiveDate) -> Option<(Term, i64)> {
    let term = season_from_month(date.month());
    let start = week_one_monday(date.year(), term)?;
    let days = (date - start).num_days();
    Some((term, round_half_up(days as f64 / 7.0)))
}

pub fn date_of(year: i32, term: Term, week: i64, weekday: Weekday) -> Option<NaiveDate> {
    let monday = week_one_monday(year, term)?;
    let offset = week
        .checked_sub(1)?
        .checked_mul(7)?
        .checked_add(i64::from(weekday.num_days_from_monday()))?;
    monday.checked_add_signed(Duration::try_days(offset)?)
}

/// Truncates toward zero, then adds one when the dropped fraction is at
/// least one half.
pub fn round_half_up(value: f64) -> i64 {
    let whole = value.trunc();
    if value - whole < 0.5 {
        whole as i64
    } else {
        whole as i64 + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn season_and_name_lookups() {
        assert_eq!(season_from_month(3), Term::Winter);
        assert_eq!(season_from_month(10), Term::Fall);
        assert_eq!(term_from_name("Summer"), Some(Term::Summer));
        assert_eq!(term_from_name("autumn"), None);
    }

    #[test]
    fn round_half_up_boundaries() {
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(0.0), 0);
        assert_eq!(round_half_up(-2.7), -2);
    }

    #[test]
    fn winter_2024_starts_on_january_15() {
        // Jan 1 2024 is itself a Monday.
        assert_eq!(week_one_monday(2024, Term::Winter), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn week_one_skips_forward_to_monday() {
        // Oct 1 2024 is a Tuesday; the next Monday is Oct 7.
        assert_eq!(week_one_monday(2024, Term::Fall), Some(ymd(2024, 10, 21)));
        // Apr 1 2023 is a Saturday; the next Monday is Apr 3.
        assert_eq!(week_one_monday(2023, Term::Spring), Some(ymd(2023, 4, 17)));
    }

    #[test]
    fn week_one_monday_is_always_a_monday() {
        for year in 2000..2040 {
            for term in Term::ALL {
                let monday = week_one_monday(year, term).unwrap();
                assert_eq!(monday.weekday(), Weekday::Mon);
                assert_eq!(monday.month(), term.first_month());
            }
        }
    }

    #[test]
    fn date_of_walks_weeks_and_weekdays() {
        assert_eq!(date_of(2024, Term::Winter, 1, Weekday::Mon), Some(ymd(2024, 1, 15)));
        assert_eq!(date_of(2024, Term::Winter, 2, Weekday::Fri), Some(ymd(2024, 1, 26)));
        assert_eq!(date_of(2024, Term::Winter, 0, Weekday::Mon), Some(ymd(2024, 1, 8)));
    }

    #[test]
    fn term_week_of_before_week_one_is_not_positive() {
        assert_eq!(term_week_of(ymd(2024, 1, 1)), Some((Term::Winter, -2)));
        assert_eq!(term_week_of(ymd(2024, 1, 15)), Some((Term::Winter, 0)));
    }

    #[test]
    fn term_week_of_inverts_date_of_from_friday() {
        let late_days = [Weekday::Fri, Weekday::Sat, Weekday::Sun];
        let early_days = [Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu];
        for year in [2023, 2024, 2025] {
            for term in Term::ALL {
                for week in 1..=8 {
                    for day in late_days {
                        let date = date_of(year, term, week, day).unwrap();
                        assert_eq!(term_week_of(date), Some((term, week)), "{date}");
                    }
                    for day in early_days {
                        let date = date_of(year, term, week, day).unwrap();
                        assert_eq!(term_week_of(date), Some((term, week - 1)), "{date}");
                    }
                }
            }
        }
    }
}
