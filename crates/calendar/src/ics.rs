//! iCalendar (`.ics`) file source.
//!
//! Reads `VEVENT`s with the `ical` parser and keeps the ones inside the
//! upcoming window. Any I/O or parse failure is logged and yields no events.

use std::path::PathBuf;

use agendai_core::{CalendarEvent, CalendarSource};
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use ical::IcalParser;
use tracing::{debug, warn};

/// Default look-ahead: today and tomorrow.
const DEFAULT_HORIZON_HOURS: i64 = 48;

/// Calendar backed by a local `.ics` export.
#[derive(Debug, Clone)]
pub struct IcsCalendar {
    path: PathBuf,
    horizon: Duration,
}

impl IcsCalendar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            horizon: Duration::hours(DEFAULT_HORIZON_HOURS),
        }
    }

    pub fn with_horizon(mut self, horizon: Duration) -> Self {
        self.horizon = horizon;
        self
    }

    /// Parse `content` and keep events that have not ended by `now` and
    /// start before `now + horizon`, sorted by start.
    pub fn events_from_str(
        content: &str,
        now: NaiveDateTime,
        horizon: Duration,
    ) -> Result<Vec<CalendarEvent>, String> {
        let limit = now + horizon;
        let mut events = Vec::new();

        for calendar in IcalParser::new(content.as_bytes()) {
            let calendar = calendar.map_err(|e| format!("{e:?}"))?;

            for event in calendar.events {
                let mut title = String::from("Sem título");
                let mut start = None;
                let mut end = None;
                let mut location = String::new();

                for property in event.properties {
                    let value = property.value.unwrap_or_default();
                    match property.name.as_str() {
                        "SUMMARY" => title = value,
                        "DTSTART" => start = parse_ical_time(&value),
                        "DTEND" => end = parse_ical_time(&value),
                        "LOCATION" => location = value,
                        _ => {}
                    }
                }

                let Some(start) = start else {
                    debug!(title = %title, "Skipping event without a usable DTSTART");
                    continue;
                };
                let end = end.filter(|e| *e >= start).unwrap_or(start);

                if end < now || start > limit {
                    continue;
                }
                events.push(CalendarEvent::new(title, start, end, location));
            }
        }

        events.sort_by_key(|e| e.start);
        Ok(events)
    }
}

/// Accepts `20261019T100000Z` (UTC), `20261019T100000` (floating local)
/// and `20261019` (all-day).
fn parse_ical_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Some(utc) = value.strip_suffix('Z') {
        let naive = NaiveDateTime::parse_from_str(utc, "%Y%m%dT%H%M%S").ok()?;
        return Some(Utc.from_utc_datetime(&naive).with_timezone(&Local).naive_local());
    }

    NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y%m%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[async_trait]
impl CalendarSource for IcsCalendar {
    fn name(&self) -> &str {
        "ics"
    }

    async fn list_events(&self) -> Vec<CalendarEvent> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Calendar file unreadable, continuing without events");
                return Vec::new();
            }
        };

        let now = Local::now().naive_local();
        match Self::events_from_str(&content, now, self.horizon) {
            Ok(events) => events,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Calendar file unparseable, continuing without events");
                Vec::new()
            }
        }
    }
}
