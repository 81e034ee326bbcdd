//! Device Calendar Provider
//!
//! The platform calendar store the native backend reads from and writes
//! through to. On desktop builds the local SQLite [`Database`] plays this
//! role.
//!
//! [`Database`]: crate::database::Database

use crate::error::AppResult;
use crate::models::{Calendar, CalendarEvent, EventPatch, NewEvent};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceCalendarProvider: Send + Sync {
    async fn request_permission(&self) -> AppResult<PermissionStatus>;

    async fn default_calendar(&self) -> AppResult<Option<Calendar>>;

    /// Every calendar able to hold events.
    async fn calendars(&self) -> AppResult<Vec<Calendar>>;

    /// Events of `calendar_ids` starting within `[start, end]`.
    async fn events(
        &self,
        calendar_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<CalendarEvent>>;

    /// Returns the provider-assigned event id.
    async fn create_event(&self, calendar_id: &str, event: &NewEvent) -> AppResult<String>;

    async fn update_event(&self, calendar_id: &str, event_id: &str, patch: &EventPatch) -> AppResult<()>;

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AppResult<()>;
}
