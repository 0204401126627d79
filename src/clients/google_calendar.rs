use reqwest::Url;
use serde::Deserialize;
use serenity::async_trait;
use tracing::{debug, warn};

use crate::config::CalendarAuth;
use crate::error::CalendarError;
use crate::models::event::CalendarEvent;
use crate::models::range::TimeRange;

const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3/";

#[async_trait]
pub trait CalendarClient: Send + Sync {
    async fn fetch_events(
        &self,
        calendar_id: &str,
        range: &TimeRange,
    ) -> Result<Vec<CalendarEvent>, CalendarError>;
}

#[derive(Debug, Deserialize)]
struct EventsPage {
    #[serde(default)]
    items: Vec<serde_json::Value>,
}

/// One page of `events.list` from Google Calendar v3.
pub struct GoogleCalendarClient {
    http: reqwest::Client,
    auth: Option<CalendarAuth>,
    base: String,
}

impl GoogleCalendarClient {
    pub fn new(auth: Option<CalendarAuth>) -> Self {
        Self::with_base(auth, CALENDAR_API_BASE)
    }

    pub fn with_base(auth: Option<CalendarAuth>, base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            base: base.to_string(),
        }
    }

    fn events_url(&self, calendar_id: &str) -> Result<Url, CalendarError> {
        let mut url = Url::parse(&self.base).map_err(|e| CalendarError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| CalendarError::Url(self.base.clone()))?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);
        Ok(url)
    }
}

#[async_trait]
impl CalendarClient for GoogleCalendarClient {
    async fn fetch_events(
        &self,
        calendar_id: &str,
        range: &TimeRange,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        let auth = self.auth.as_ref().ok_or(CalendarError::MissingCredentials)?;
        let url = self.events_url(calendar_id)?;
        let mut request = self.http.get(url).query(&[
            ("timeMin", range.start.to_rfc3339()),
            ("timeMax", range.end.to_rfc3339()),
            ("singleEvents", "true".to_string()),
        ]);
        request = match auth {
            CalendarAuth::ApiKey(key) => request.query(&[("key", key)]),
            CalendarAuth::AccessToken(token) => request.bearer_auth(token),
        };

        debug!(calendar_id, start = %range.start, end = %range.end, "fetching calendar events");
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CalendarError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let page: EventsPage = response.json().await?;
        Ok(decode_events(page.items))
    }
}

/// Records that do not fit [`CalendarEvent`] are logged and dropped.
pub fn decode_events(items: Vec<serde_json::Value>) -> Vec<CalendarEvent> {
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<CalendarEvent>(item) {
            Ok(event) => Some(event),
            Err(err) => {
                warn!(error = %err, "skipping undecodable calendar event");
                None
            }
        })
        .collect()
}
