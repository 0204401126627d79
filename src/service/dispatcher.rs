//! Reads `^command argument` lines out of a chat message and decides what to
//! answer. Nothing here talks to the network: event lookups come back as
//! [`Reply::Events`] for the caller to fetch.

use std::sync::{Arc, LazyLock};

use chrono::DateTime;
use chrono_tz::Tz;
use regex::Regex;
use tracing::debug;

use crate::config::Profile;
use crate::error::DateParseError;
use crate::models::range::TimeRange;
use crate::service::date_range::DateRangeResolver;
use crate::service::quote_book::QuoteBook;

pub const NO_EVENTS_REPLY: &str = "There are no calendar events scheduled for that week.";
pub const TABLE_FLIP: &str = "（╯°□°）╯︵(\\ .o.)\\";
pub const TABLE_FLIP_REPLY: &str = "ಠ_ಠ";
const NO_QUOTES_REPLY: &str = "I'm fresh out of quotes.";

static COMMAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\^(\w+)[^\S\n]?(.+)?$").expect("command pattern compiles")
});

static COMPOUND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+) (to|->) (.+)$").expect("compound pattern compiles"));

static ALL_CALENDARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\ball\b").expect("all pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventsQuery {
    pub calendar_ids: Vec<String>,
    pub range: TimeRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Events(EventsQuery),
    /// Admin asked for a restart; the text is posted before the process exits.
    Restart(String),
}

pub struct CommandDispatcher {
    profile: Arc<Profile>,
    resolver: DateRangeResolver,
    quotes: Arc<QuoteBook>,
}

impl CommandDispatcher {
    pub fn new(profile: Arc<Profile>, resolver: DateRangeResolver, quotes: Arc<QuoteBook>) -> Self {
        Self {
            profile,
            resolver,
            quotes,
        }
    }

    pub fn timezone(&self) -> &Tz {
        self.resolver.timezone()
    }

    /// One reply per recognised command line, in message order.
    pub fn dispatch(&self, text: &str, user_id: &str, now: DateTime<Tz>) -> Vec<Reply> {
        if text == TABLE_FLIP {
            return vec![Reply::Text(TABLE_FLIP_REPLY.to_string())];
        }

        let mut replies = Vec::new();
        for caps in COMMAND.captures_iter(text) {
            let command = caps[1].to_lowercase();
            let argument = caps.get(2).map_or("", |m| m.as_str());
            debug!(command = %command, argument, user_id, "dispatching command");
            let reply = match command.as_str() {
                "hello" => Some(Reply::Text("Hello, world!".to_string())),
                "hype" => Some(Reply::Text("Hype!".to_string())),
                "quote" | "psycho" => Some(Reply::Text(self.quote())),
                "restart" => self
                    .profile
                    .is_admin(user_id)
                    .then(|| Reply::Restart(self.quote())),
                "events" => Some(self.events(argument, user_id, now)),
                _ => Some(Reply::Text(format!(
                    "I don't understand what you said, <@{user_id}>"
                ))),
            };
            replies.extend(reply);
        }
        replies
    }

    fn quote(&self) -> String {
        self.quotes
            .random()
            .map(str::to_string)
            .unwrap_or_else(|| NO_QUOTES_REPLY.to_string())
    }

    fn events(&self, argument: &str, user_id: &str, now: DateTime<Tz>) -> Reply {
        let (calendar_ids, phrase) = self.select_calendars(&argument.trim().to_lowercase());
        match self.resolve_phrase(&phrase, now) {
            Ok(range) => Reply::Events(EventsQuery {
                calendar_ids,
                range,
            }),
            Err((input, err)) => Reply::Text(format!(
                "'{input}' isn't a date, <@{user_id}>. Reason: {err}"
            )),
        }
    }

    /// Picks the calendars named in `phrase` and returns what is left of it.
    fn select_calendars(&self, phrase: &str) -> (Vec<String>, String) {
        if ALL_CALENDARS.is_match(phrase) {
            let rest = ALL_CALENDARS.replace_all(phrase, "");
            return (self.profile.all_calendar_ids(), squash_spaces(&rest));
        }
        for calendar in &self.profile.calendars {
            let name = calendar.name.to_lowercase();
            if !name.is_empty() && phrase.contains(&name) {
                let rest = phrase.replace(&name, "");
                return (vec![calendar.id.clone()], squash_spaces(&rest));
            }
        }
        (
            vec![self.profile.default_calendar.clone()],
            squash_spaces(phrase),
        )
    }

    /// `A to B` runs from the start of A to the start of B; `A -> B` runs to
    /// the end of B.
    fn resolve_phrase(
        &self,
        phrase: &str,
        now: DateTime<Tz>,
    ) -> Result<TimeRange, (String, DateParseError)> {
        let resolve = |text: &str| {
            self.resolver
                .resolve(text, now)
                .map_err(|err| (text.to_string(), err))
        };
        let Some(caps) = COMPOUND.captures(phrase) else {
            return resolve(phrase);
        };
        let from = resolve(&caps[1])?;
        let until = resolve(&caps[3])?;
        let end = if &caps[2] == "to" { until.start } else { until.end };
        Ok(TimeRange::new(from.start, end))
    }
}

fn squash_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
