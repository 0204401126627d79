//! Error types shared across the bot.

use thiserror::Error;

/// Why a range phrase could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateParseReason {
    #[error("Invalid Date Format")]
    InvalidDateFormat,

    #[error("Invalid Term (Summer, Fall, Spring, Winter)")]
    InvalidTerm,

    #[error("Invalid Weekday")]
    InvalidWeekday,
}

/// A phrase (or a token inside it) that the resolver rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Error parsing {input}: {reason}")]
pub struct DateParseError {
    pub input: String,
    pub reason: DateParseReason,
}

impl DateParseError {
    pub fn new(input: impl Into<String>, reason: DateParseReason) -> Self {
        Self {
            input: input.into(),
            reason,
        }
    }
}

#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("calendar request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("calendar request returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid calendar url: {0}")]
    Url(String),

    #[error("no calendar credentials configured (set GOOGLE_API_KEY or GOOGLE_ACCESS_TOKEN)")]
    MissingCredentials,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },

    #[error("failed to parse profiles in {path}: {source}")]
    Profiles {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no profile named '{0}'")]
    UnknownTeam(String),

    #[error("unknown time zone '{0}'")]
    InvalidTimezone(String),

    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
