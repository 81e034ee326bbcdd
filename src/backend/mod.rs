//! Calendar backends
//!
//! The engine works against [`CalendarBackend`] and never branches on
//! platform. [`MirroredBackend`] treats the hosted gateway as the only
//! source of truth; [`NativeDeviceBackend`] reads the device calendar
//! store and keeps passive mirror rows in the gateway. One of the two is
//! picked at startup from [`BackendMode`].

use crate::auth::Session;
use crate::error::{AppError, AppResult};
use crate::models::{Calendar, CalendarEvent, EventPatch, NewEvent};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub mod mirrored;
pub mod native;

pub use mirrored::MirroredBackend;
pub use native::NativeDeviceBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    Mirrored,
    Native,
}

impl BackendMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendMode::Mirrored => "mirrored",
            BackendMode::Native => "native",
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mirrored" | "web" => Ok(BackendMode::Mirrored),
            "native" | "device" => Ok(BackendMode::Native),
            other => Err(AppError::config(format!("Unknown backend mode '{}'", other))),
        }
    }
}

/// Calendars plus the selection to start from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarLoad {
    pub calendars: Vec<Calendar>,
    pub selection: Vec<Calendar>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CalendarBackend: Send + Sync {
    fn mode(&self) -> BackendMode;

    async fn load_calendars(&self, session: &Session) -> AppResult<CalendarLoad>;

    /// Events of the `selected` calendars, in no particular order.
    async fn fetch_events(&self, session: &Session, selected: &[Calendar]) -> AppResult<Vec<CalendarEvent>>;

    async fn create_event(&self, session: &Session, calendar_id: &str, event: &NewEvent) -> AppResult<CalendarEvent>;

    /// `calendar_id` is the calendar currently owning the event, when known.
    async fn update_event(
        &self,
        session: &Session,
        event_id: &str,
        calendar_id: Option<String>,
        patch: &EventPatch,
    ) -> AppResult<()>;

    async fn delete_event(&self, session: &Session, event: &CalendarEvent) -> AppResult<()>;
}
