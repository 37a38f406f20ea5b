//! Calendar sources for Agendai.
//!
//! All sources implement `agendai_core::CalendarSource`. The factory picks
//! one from configuration.

pub mod ics;
pub mod mock;

use std::sync::Arc;

use agendai_config::{AppConfig, CalendarKind};
use agendai_core::{CalendarEvent, CalendarSource};
use async_trait::async_trait;
use chrono::Duration;
use tracing::info;

pub use ics::IcsCalendar;
pub use mock::MockCalendar;

/// A source that always returns the same events.
#[derive(Debug, Clone, Default)]
pub struct StaticCalendar {
    events: Vec<CalendarEvent>,
}

impl StaticCalendar {
    pub fn new(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CalendarSource for StaticCalendar {
    fn name(&self) -> &str {
        "static"
    }

    async fn list_events(&self) -> Vec<CalendarEvent> {
        self.events.clone()
    }
}

/// Build the calendar source named by `config.calendar.source`.
pub fn build_from_config(config: &AppConfig) -> Arc<dyn CalendarSource> {
    let source: Arc<dyn CalendarSource> = match config.calendar.source {
        CalendarKind::Mock => Arc::new(MockCalendar::new()),
        CalendarKind::Ics => match config.calendar.ics_path.as_deref() {
            Some(path) => Arc::new(
                IcsCalendar::new(path)
                    .with_horizon(Duration::hours(i64::from(config.calendar.horizon_hours))),
            ),
            None => Arc::new(StaticCalendar::empty()),
        },
        CalendarKind::None => Arc::new(StaticCalendar::empty()),
    };
    info!(source = source.name(), "Calendar source ready");
    source
}

#[cfg(test)]
mod tests {
    use super::*;
    use agendai_config::CalendarConfig;

    #[tokio::test]
    async fn static_calendar_returns_its_events() {
        let calendar = StaticCalendar::empty();
        assert!(calendar.list_events().await.is_empty());
    }

    #[test]
    fn factory_defaults_to_mock() {
        let source = build_from_config(&AppConfig::default());
        assert_eq!(source.name(), "mock");
    }

    #[test]
    fn factory_honours_none_and_ics() {
        let mut config = AppConfig::default();
        config.calendar = CalendarConfig {
            source: CalendarKind::None,
            ..CalendarConfig::default()
        };
        assert_eq!(build_from_config(&config).name(), "static");

        config.calendar = CalendarConfig {
            source: CalendarKind::Ics,
            ics_path: Some("/tmp/agenda.ics".into()),
            ..CalendarConfig::default()
        };
        assert_eq!(build_from_config(&config).name(), "ics");
    }

    #[tokio::test]
    async fn factory_applies_configured_horizon() {
        let start = chrono::Local::now().naive_local() + Duration::hours(30);
        let end = start + Duration::hours(1);
        let ics = format!(
            "BEGIN:VCALENDAR\nVERSION:2.0\nPRODID:-//agendai//test//EN\n\
BEGIN:VEVENT\nUID:1\nSUMMARY:Consulta\nDTSTART:{}\nDTEND:{}\nEND:VEVENT\n\
END:VCALENDAR\n",
            start.format("%Y%m%dT%H%M%S"),
            end.format("%Y%m%dT%H%M%S"),
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agenda.ics");
        std::fs::write(&path, ics).unwrap();

        let mut config = AppConfig::default();
        config.calendar = CalendarConfig {
            source: CalendarKind::Ics,
            ics_path: Some(path.display().to_string()),
            horizon_hours: 12,
        };
        assert!(build_from_config(&config).list_events().await.is_empty());

        config.calendar.horizon_hours = 48;
        let events = build_from_config(&config).list_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Consulta");
    }
}
