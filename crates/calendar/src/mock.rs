//! Sample commitments generated relative to the current time.
//!
//! Stands in for a real calendar API until one is wired up.

use agendai_core::{CalendarEvent, CalendarSource};
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDateTime, NaiveTime, Timelike};

/// Generates three fixed commitments around "now".
#[derive(Debug, Clone, Default)]
pub struct MockCalendar {
    /// Frozen clock for deterministic output. `None` = wall clock.
    now: Option<NaiveDateTime>,
}

impl MockCalendar {
    pub fn new() -> Self {
        Self { now: None }
    }

    /// Pin the clock.
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now: Some(now) }
    }

    fn now(&self) -> NaiveDateTime {
        let now = self.now.unwrap_or_else(|| Local::now().naive_local());
        now.with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now)
    }

    /// The events as of `now`.
    pub fn events_at(now: NaiveDateTime) -> Vec<CalendarEvent> {
        let tomorrow = now.date() + Duration::days(1);
        let evening = (now + Duration::hours(6)).date();

        vec![
            CalendarEvent::new(
                "Reunião de Alinhamento do Projeto X",
                now + Duration::hours(2),
                now + Duration::hours(3),
                "Zoom Call",
            ),
            CalendarEvent::new(
                "Compromisso Médico Anual",
                tomorrow.and_time(hm(10, 0)),
                tomorrow.and_time(hm(11, 30)),
                "Clínica Central",
            ),
            CalendarEvent::new(
                "Treino de Tênis",
                evening.and_time(hm(18, 0)),
                evening.and_time(hm(19, 30)),
                "Clube",
            ),
        ]
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

#[async_trait]
impl CalendarSource for MockCalendar {
    fn name(&self) -> &str {
        "mock"
    }

    async fn list_events(&self) -> Vec<CalendarEvent> {
        Self::events_at(self.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn morning() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 15, 42)
            .unwrap()
    }

    #[tokio::test]
    async fn pinned_clock_is_deterministic() {
        let calendar = MockCalendar::at(morning());
        let events = calendar.list_events().await;
        assert_eq!(events.len(), 3);
        assert_eq!(events, calendar.list_events().await);
    }

    #[tokio::test]
    async fn meeting_starts_two_hours_from_now_on_the_minute() {
        let events = MockCalendar::at(morning()).list_events().await;
        let meeting = &events[0];
        assert_eq!(meeting.location, "Zoom Call");
        assert_eq!(meeting.window(), "2026-10-19 10:15 - 2026-10-19 11:15");
    }

    #[test]
    fn doctor_is_tomorrow_morning() {
        let events = MockCalendar::events_at(morning());
        assert_eq!(events[1].window(), "2026-10-20 10:00 - 2026-10-20 11:30");
    }

    #[test]
    fn late_evening_rolls_tennis_to_next_day() {
        let late = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(21, 0, 0)
            .unwrap();
        let events = MockCalendar::events_at(late);
        assert_eq!(events[2].window(), "2026-10-20 18:00 - 2026-10-20 19:30");
    }

    #[test]
    fn every_event_ends_after_it_starts() {
        for event in MockCalendar::events_at(morning()) {
            assert!(event.end > event.start, "{} has an empty window", event.title);
        }
    }
}
