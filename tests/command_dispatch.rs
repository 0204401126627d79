use std::sync::Arc;

use calBot::config::{NamedCalendar, Profile};
use calBot::service::date_range::DateRangeResolver;
use calBot::service::dispatcher::{
    CommandDispatcher, EventsQuery, Reply, TABLE_FLIP, TABLE_FLIP_REPLY,
};
use calBot::service::quote_book::QuoteBook;
use chrono::{DateTime, TimeZone};
use chrono_tz::Tz;

fn tz() -> Tz {
    chrono_tz::America::Detroit
}

fn at(y: i32, m: u32, d: u32) -> DateTime<Tz> {
    tz().with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn now() -> DateTime<Tz> {
    tz().with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap()
}

fn profile() -> Profile {
    Profile {
        admins: vec!["admin".to_string()],
        default_channel: "general".to_string(),
        default_calendar: "main@calendar".to_string(),
        calendars: vec![
            NamedCalendar {
                name: "Club".to_string(),
                id: "club@calendar".to_string(),
            },
            NamedCalendar {
                name: "Sports".to_string(),
                id: "sports@calendar".to_string(),
            },
        ],
    }
}

fn dispatcher_with_quotes(quotes: Vec<&str>) -> CommandDispatcher {
    CommandDispatcher::new(
        Arc::new(profile()),
        DateRangeResolver::new(tz()),
        Arc::new(QuoteBook::new(quotes.into_iter().map(str::to_string).collect())),
    )
}

fn dispatcher() -> CommandDispatcher {
    dispatcher_with_quotes(vec!["Stay hungry."])
}

fn single_query(text: &str) -> EventsQuery {
    let mut replies = dispatcher().dispatch(text, "u1", now());
    assert_eq!(replies.len(), 1, "one reply for {text:?}");
    match replies.remove(0) {
        Reply::Events(query) => query,
        other => panic!("expected an events lookup for {text:?}, got {other:?}"),
    }
}

fn text(value: &str) -> Reply {
    Reply::Text(value.to_string())
}

#[test]
fn simple_commands_answer_with_fixed_text() {
    let d = dispatcher();
    assert_eq!(d.dispatch("^hello", "u1", now()), vec![text("Hello, world!")]);
    assert_eq!(d.dispatch("^HYPE", "u1", now()), vec![text("Hype!")]);
}

#[test]
fn unknown_command_mentions_the_sender() {
    assert_eq!(
        dispatcher().dispatch("^dance now", "u1", now()),
        vec![text("I don't understand what you said, <@u1>")]
    );
}

#[test]
fn plain_chat_is_ignored() {
    assert!(dispatcher().dispatch("hello there", "u1", now()).is_empty());
    assert!(dispatcher().dispatch("what about ^hello", "u1", now()).is_empty());
}

#[test]
fn every_command_line_gets_a_reply_in_order() {
    let replies = dispatcher().dispatch("^hello\njust chatting\n^hype\n^nope", "u1", now());
    assert_eq!(
        replies,
        vec![
            text("Hello, world!"),
            text("Hype!"),
            text("I don't understand what you said, <@u1>"),
        ]
    );
}

#[test]
fn table_flip_gets_a_look() {
    assert_eq!(
        dispatcher().dispatch(TABLE_FLIP, "u1", now()),
        vec![text(TABLE_FLIP_REPLY)]
    );
}

#[test]
fn quote_comes_from_the_book() {
    let d = dispatcher();
    assert_eq!(d.dispatch("^quote", "u1", now()), vec![text("Stay hungry.")]);
    assert_eq!(d.dispatch("^psycho", "u1", now()), vec![text("Stay hungry.")]);
}

#[test]
fn empty_quote_book_says_so() {
    let d = dispatcher_with_quotes(Vec::new());
    assert_eq!(
        d.dispatch("^quote", "u1", now()),
        vec![text("I'm fresh out of quotes.")]
    );
}

#[test]
fn restart_is_only_for_admins() {
    let d = dispatcher();
    assert_eq!(
        d.dispatch("^restart", "admin", now()),
        vec![Reply::Restart("Stay hungry.".to_string())]
    );
    assert!(d.dispatch("^restart", "u1", now()).is_empty());
}

#[test]
fn events_default_to_the_default_calendar() {
    let query = single_query("^events today");
    assert_eq!(query.calendar_ids, vec!["main@calendar".to_string()]);
    assert_eq!(query.range.start, at(2024, 3, 15));
    assert_eq!(query.range.end, at(2024, 3, 16));
}

#[test]
fn bare_events_covers_the_coming_week() {
    let query = single_query("^events");
    assert_eq!(query.range.start, at(2024, 3, 15));
    assert_eq!(query.range.end, at(2024, 3, 22));
}

#[test]
fn named_calendar_is_selected_and_removed_from_the_phrase() {
    let query = single_query("^events Club Tomorrow");
    assert_eq!(query.calendar_ids, vec!["club@calendar".to_string()]);
    assert_eq!(query.range.start, at(2024, 3, 16));
    assert_eq!(query.range.end, at(2024, 3, 17));
}

#[test]
fn all_selects_every_calendar() {
    let query = single_query("^events all week 2");
    assert_eq!(
        query.calendar_ids,
        vec![
            "main@calendar".to_string(),
            "club@calendar".to_string(),
            "sports@calendar".to_string(),
        ]
    );
    assert_eq!(query.range.start, at(2024, 1, 22));
    assert_eq!(query.range.end, at(2024, 1, 29));
}

#[test]
fn fall_is_a_term_not_all() {
    let query = single_query("^events fall week 1");
    assert_eq!(query.calendar_ids, vec!["main@calendar".to_string()]);
    assert_eq!(query.range.start, at(2024, 10, 21));
    assert_eq!(query.range.end, at(2024, 10, 28));
}

#[test]
fn to_stops_at_the_start_of_the_second_phrase() {
    let query = single_query("^events today to tomorrow");
    assert_eq!(query.range.start, at(2024, 3, 15));
    assert_eq!(query.range.end, at(2024, 3, 16));
}

#[test]
fn arrow_runs_through_the_second_phrase() {
    let query = single_query("^events today -> tomorrow");
    assert_eq!(query.range.start, at(2024, 3, 15));
    assert_eq!(query.range.end, at(2024, 3, 17));
}

#[test]
fn week_ranges_chain_across_terms() {
    let query = single_query("^events winter week 1 -> spring week 1");
    assert_eq!(query.range.start, at(2024, 1, 15));
    assert_eq!(query.range.end, at(2024, 4, 22));
}

#[test]
fn unparseable_phrase_explains_itself() {
    assert_eq!(
        dispatcher().dispatch("^events someday", "u1", now()),
        vec![text(
            "'someday' isn't a date, <@u1>. Reason: Error parsing someday: Invalid Date Format"
        )]
    );
}

#[test]
fn error_names_the_failing_side_of_a_range() {
    assert_eq!(
        dispatcher().dispatch("^events today to whenever", "u1", now()),
        vec![text(
            "'whenever' isn't a date, <@u1>. Reason: Error parsing whenever: Invalid Date Format"
        )]
    );
}

#[test]
fn bad_term_reason_lists_the_terms() {
    let replies = dispatcher().dispatch("^events autumn week 1", "u1", now());
    assert_eq!(
        replies,
        vec![text(
            "'autumn week 1' isn't a date, <@u1>. Reason: Error parsing autumn week 1: Invalid Term (Summer, Fall, Spring, Winter)"
        )]
    );
}
