// file: src/models/event.rs
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub notes: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub calendar_id: String,
}

impl CalendarEvent {
    /// Merge `patch` into this event. Fields absent from the patch are kept.
    pub fn apply(&mut self, patch: &EventPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(notes) = &patch.notes {
            self.notes = Some(notes.clone());
        }
        if let Some(start) = patch.start_date {
            self.start_date = start;
        }
        if let Some(end) = patch.end_date {
            self.end_date = end;
        }
        if let Some(location) = &patch.location {
            self.location = Some(location.clone());
        }
        if let Some(calendar_id) = &patch.calendar_id {
            self.calendar_id = calendar_id.clone();
        }
    }
}

/// Partial event data supplied when creating an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    pub notes: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub calendar_id: Option<String>,
}

impl NewEvent {
    pub fn new(
        title: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        calendar_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            notes: None,
            start_date,
            end_date,
            location: None,
            calendar_id: Some(calendar_id.into()),
        }
    }

    /// Checks the creation preconditions and returns the owning calendar id.
    pub fn validate(&self) -> AppResult<&str> {
        let calendar_id = self
            .calendar_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::invalid_input("calendar id is required"))?;

        if self.end_date < self.start_date {
            return Err(AppError::invalid_input("event end must not precede its start"));
        }

        Ok(calendar_id)
    }

    pub fn into_event(self, id: String, calendar_id: String) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title,
            notes: self.notes,
            start_date: self.start_date,
            end_date: self.end_date,
            location: self.location,
            calendar_id,
        }
    }
}

/// Partial update for an existing event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub notes: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub calendar_id: Option<String>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self == &EventPatch::default()
    }
}
