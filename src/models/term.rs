use chrono::Weekday;

/// Academic term. The month table is a local convention and does not follow
/// the astronomical seasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Term {
    Winter = 1,
    Spring = 2,
    Summer = 3,
    Fall = 4,
}

impl Term {
    pub const ALL: [Term; 4] = [Term::Winter, Term::Spring, Term::Summer, Term::Fall];

    pub fn from_month(month: u32) -> Term {
        match month {
            1..=3 => Term::Winter,
            4..=6 => Term::Spring,
            7..=9 => Term::Summer,
            _ => Term::Fall,
        }
    }

    /// Case-insensitive lookup of "winter", "spring", "summer" or "fall".
    pub fn from_name(name: &str) -> Option<Term> {
        match name.to_ascii_lowercase().as_str() {
            "winter" => Some(Term::Winter),
            "spring" => Some(Term::Spring),
            "summer" => Some(Term::Summer),
            "fall" => Some(Term::Fall),
            _ => None,
        }
    }

    pub fn number(self) -> u32 {
        self as u32
    }

    pub fn first_month(self) -> u32 {
        self.number() * 3 - 2
    }
}

/// Parses a weekday from the first three letters of `token`, ignoring case.
/// "tues", "thur" and full names work because only the prefix is read.
pub fn parse_weekday(token: &str) -> Option<Weekday> {
    let lower = token.to_ascii_lowercase();
    let prefix = lower.get(..3)?;
    match prefix {
        "mon" => Some(Weekday::Mon),
        "tue" => Some(Weekday::Tue),
        "wed" => Some(Weekday::Wed),
        "thu" => Some(Weekday::Thu),
        "fri" => Some(Weekday::Fri),
        "sat" => Some(Weekday::Sat),
        "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Weekday from a whole word: the full name or a usual abbreviation
/// ("mon", "tues", "thurs"). Unlike [`parse_weekday`], "month" is not Monday.
pub fn parse_weekday_word(token: &str) -> Option<Weekday> {
    match token.to_ascii_lowercase().as_str() {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tues" | "tuesday" => Some(Weekday::Tue),
        "wed" | "weds" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thur" | "thurs" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}
