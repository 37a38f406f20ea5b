//! CalendarSource trait: where the day's fixed commitments come from.

use async_trait::async_trait;

use crate::task::CalendarEvent;

/// Supplies fixed-time events for the current day.
///
/// `list_events` cannot fail: an analysis must go ahead without calendar
/// context, so implementations backed by external data log a warning and
/// return an empty list instead of an error.
#[async_trait]
pub trait CalendarSource: Send + Sync {
    fn name(&self) -> &str;

    async fn list_events(&self) -> Vec<CalendarEvent>;
}
