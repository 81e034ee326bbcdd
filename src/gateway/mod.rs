//! Remote Data Gateway
//!
//! The hosted backend holds three per-user tables: `calendars`, `events`
//! and `energy_levels`. The engine only ever talks to it through the
//! [`RemoteGateway`] trait so the HTTP client can be swapped for fakes.

use crate::auth::Session;
use crate::error::AppResult;
use crate::models::{Calendar, CalendarEvent, EnergyLevel, EnergyLevelKind, EventPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod mirror;
pub mod rest;

pub use rest::RestGateway;

pub const CALENDARS_TABLE: &str = "calendars";
pub const EVENTS_TABLE: &str = "events";
pub const ENERGY_LEVELS_TABLE: &str = "energy_levels";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarRow {
    pub id: String,
    pub title: String,
    pub color: String,
    pub source: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CalendarRow {
    /// Mirror row for a device calendar, with placeholder title/colour/source.
    pub fn mirror_of(calendar: &Calendar, user_id: &str) -> Self {
        Self {
            id: calendar.id.clone(),
            title: calendar.display_title().to_string(),
            color: calendar.display_color().to_string(),
            source: calendar.source_name().to_string(),
            user_id: user_id.to_string(),
            created_at: None,
        }
    }

    pub fn into_calendar(self) -> Calendar {
        Calendar::mirrored(self.id, self.title, self.color, self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRow {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub calendar_id: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl EventRow {
    pub fn into_event(self) -> CalendarEvent {
        CalendarEvent {
            id: self.id,
            title: self.title,
            notes: self.description,
            start_date: self.start_date,
            end_date: self.end_date,
            location: self.location,
            calendar_id: self.calendar_id,
        }
    }
}

/// Insert payload. `id` is omitted when the gateway should assign one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventInsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub calendar_id: String,
    pub user_id: String,
}

impl EventInsert {
    /// Mirror of a device event, keeping the provider-assigned id.
    pub fn mirror_of(event: &CalendarEvent, calendar_id: &str, user_id: &str) -> Self {
        Self {
            id: Some(event.id.clone()),
            title: event.title.clone(),
            description: event.notes.clone(),
            start_date: event.start_date,
            end_date: event.end_date,
            location: event.location.clone(),
            calendar_id: calendar_id.to_string(),
            user_id: user_id.to_string(),
        }
    }
}

/// Update payload. Absent fields are left untouched by the gateway;
/// `Some(None)` on a nullable column writes `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calendar_id: Option<String>,
}

impl From<&EventPatch> for EventUpdate {
    fn from(patch: &EventPatch) -> Self {
        Self {
            title: patch.title.clone(),
            description: patch.notes.clone().map(Some),
            start_date: patch.start_date,
            end_date: patch.end_date,
            location: patch.location.clone().map(Some),
            calendar_id: patch.calendar_id.clone(),
        }
    }
}

impl From<EventInsert> for EventUpdate {
    fn from(insert: EventInsert) -> Self {
        Self {
            title: Some(insert.title),
            description: Some(insert.description),
            start_date: Some(insert.start_date),
            end_date: Some(insert.end_date),
            location: Some(insert.location),
            calendar_id: Some(insert.calendar_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyLevelRow {
    pub id: String,
    pub level: String,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl EnergyLevelRow {
    pub fn into_energy_level(self) -> Result<EnergyLevel, String> {
        Ok(EnergyLevel {
            level: EnergyLevelKind::parse(&self.level)?,
            id: self.id,
            description: self.description,
            timestamp: self.timestamp,
            user_id: self.user_id,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergyLevelInsert {
    pub level: String,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}

/// Authenticated CRUD over the hosted tables. Every call is scoped to
/// `session.user_id`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    async fn list_calendars(&self, session: &Session) -> AppResult<Vec<CalendarRow>>;

    /// Existence probe; `Ok(None)` when no row has this id.
    async fn find_calendar(&self, session: &Session, id: &str) -> AppResult<Option<CalendarRow>>;

    async fn insert_calendar(&self, session: &Session, row: &CalendarRow) -> AppResult<()>;

    async fn list_events(&self, session: &Session, calendar_ids: &[String]) -> AppResult<Vec<EventRow>>;

    async fn find_event(&self, session: &Session, id: &str) -> AppResult<Option<EventRow>>;

    /// Returns the stored row, including the gateway-assigned id.
    async fn insert_event(&self, session: &Session, row: &EventInsert) -> AppResult<EventRow>;

    async fn update_event(&self, session: &Session, id: &str, changes: &EventUpdate) -> AppResult<()>;

    async fn delete_event(&self, session: &Session, id: &str) -> AppResult<()>;

    async fn list_energy_levels(&self, session: &Session) -> AppResult<Vec<EnergyLevelRow>>;

    async fn insert_energy_level(&self, session: &Session, row: &EnergyLevelInsert) -> AppResult<EnergyLevelRow>;
}
