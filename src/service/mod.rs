pub mod date_range;
pub mod dispatcher;
pub mod event_formatter;
pub mod event_lookup;
pub mod quote_book;
pub mod term_calendar;
