//! Calendar Synchronization Engine
//!
//! Owns the in-memory snapshot of calendars, events, selection and status.
//! Callers share one engine through an `Arc`, read clones of the snapshot
//! and mutate it only through the operations below. Operations never return
//! their failure: the message lands in `status.error` and the log, and the
//! snapshot stays at its last successful state.
//!
//! Only [`CalendarSyncEngine::sync_local_calendars`] is guarded against
//! overlap. Overlapping loads or mutations race and the last write wins.

use crate::auth::{Session, SessionStore};
use crate::backend::{BackendMode, CalendarBackend};
use crate::error::AppError;
use crate::models::{Calendar, CalendarEvent, EventPatch, NewEvent, SyncResult, SyncStatus};
use crate::selection::SelectionState;
use crate::utils::logging;
use crate::views::{self, Week};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use log::{debug, info};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub calendars: Vec<Calendar>,
    pub events: Vec<CalendarEvent>,
    pub selection: SelectionState,
    pub status: SyncStatus,
}

pub struct CalendarSyncEngine {
    backend: Arc<dyn CalendarBackend>,
    sessions: SessionStore,
    tz: Tz,
    state: RwLock<Snapshot>,
}

fn record_failure(snapshot: &mut Snapshot, error: &AppError, operation: &str) {
    logging::log_error_with_context(error, operation);
    snapshot.status.error = Some(error.to_string());
}

impl CalendarSyncEngine {
    pub fn new(backend: Arc<dyn CalendarBackend>, sessions: SessionStore, tz: Tz) -> Self {
        Self {
            backend,
            sessions,
            tz,
            state: RwLock::new(Snapshot::default()),
        }
    }

    pub fn mode(&self) -> BackendMode {
        self.backend.mode()
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    async fn fail(&self, error: AppError, operation: &str) {
        let mut state = self.state.write().await;
        record_failure(&mut state, &error, operation);
        state.status.is_loading = false;
    }

    async fn session_for(&self, operation: &str) -> Option<Session> {
        match self.sessions.require().await {
            Ok(session) => Some(session),
            Err(e) => {
                let mut state = self.state.write().await;
                record_failure(&mut state, &e, operation);
                None
            }
        }
    }

    async fn begin(&self) {
        let mut state = self.state.write().await;
        state.status.is_loading = true;
        state.status.error = None;
    }

    /// Replace the calendar set and selection from the active backend.
    pub async fn load_calendars(&self) {
        let Some(session) = self.session_for("load calendars").await else {
            return;
        };

        self.begin().await;
        let result = self.backend.load_calendars(&session).await;

        let mut state = self.state.write().await;
        match result {
            Ok(load) => {
                info!(
                    "Loaded {} calendars ({} selected)",
                    load.calendars.len(),
                    load.selection.len()
                );
                state.calendars = load.calendars;
                state.selection.replace(load.selection);
            }
            Err(e) => record_failure(&mut state, &e, "load calendars"),
        }
        state.status.is_loading = false;
    }

    /// Pull events for the selected calendars and replace the event snapshot.
    /// Dropped without side effects while another sync is running.
    pub async fn sync_local_calendars(&self) -> SyncResult {
        let Some(session) = self.session_for("sync calendars").await else {
            return SyncResult::with_error(AppError::AuthenticationRequired.to_string());
        };

        let selected = {
            let mut state = self.state.write().await;
            if state.selection.selected_calendars.is_empty() {
                let error = AppError::NoCalendarsSelected;
                record_failure(&mut state, &error, "sync calendars");
                return SyncResult::with_error(error.to_string());
            }
            if state.status.sync_in_progress {
                debug!("Sync already in progress, dropping request");
                return SyncResult::skipped();
            }
            state.status.sync_in_progress = true;
            state.status.is_loading = true;
            state.status.error = None;
            state.selection.selected_calendars.clone()
        };

        let started = Instant::now();
        let result = self.backend.fetch_events(&session, &selected).await;

        let mut state = self.state.write().await;
        state.status.sync_in_progress = false;
        state.status.is_loading = false;

        match result {
            Ok(mut events) => {
                events.sort_by_key(|event| event.start_date);
                let count = events.len();
                state.events = events;
                logging::log_calendar_sync(
                    self.backend.mode().as_str(),
                    count,
                    started.elapsed().as_millis() as u64,
                );
                SyncResult::with_count(count)
            }
            Err(e) => {
                record_failure(&mut state, &e, "sync calendars");
                SyncResult::with_error(e.to_string())
            }
        }
    }

    pub async fn toggle_calendar_selection(&self, calendar: &Calendar) {
        self.state.write().await.selection.toggle(calendar);
    }

    pub async fn select_all_calendars(&self) {
        let mut state = self.state.write().await;
        let calendars = state.calendars.clone();
        state.selection.select_all(&calendars);
    }

    pub async fn deselect_all_calendars(&self) {
        self.state.write().await.selection.deselect_all();
    }

    pub async fn set_selected_date(&self, date: DateTime<Utc>) {
        self.state.write().await.selection.set_date(date);
    }

    /// Create an event through the backend and append it to the snapshot.
    /// The calendar id is not checked against the known calendars.
    pub async fn add_event(&self, event: NewEvent) {
        let Some(session) = self.session_for("add event").await else {
            return;
        };

        let calendar_id = match event.validate() {
            Ok(id) => id.to_string(),
            Err(e) => {
                self.fail(e, "add event").await;
                return;
            }
        };

        self.begin().await;
        let result = self.backend.create_event(&session, &calendar_id, &event).await;

        let mut state = self.state.write().await;
        match result {
            Ok(created) => {
                debug!("Added event {} to calendar {}", created.id, created.calendar_id);
                state.events.push(created);
            }
            Err(e) => record_failure(&mut state, &e, "add event"),
        }
        state.status.is_loading = false;
    }

    /// Write `patch` through the backend, then merge it into the snapshot
    /// entry. An id missing from the snapshot leaves the snapshot untouched.
    pub async fn update_event(&self, event_id: &str, patch: EventPatch) {
        let Some(session) = self.session_for("update event").await else {
            return;
        };

        self.begin().await;
        let owner = self
            .state
            .read()
            .await
            .events
            .iter()
            .find(|e| e.id == event_id)
            .map(|e| e.calendar_id.clone());

        let result = self
            .backend
            .update_event(&session, event_id, owner, &patch)
            .await;

        let mut state = self.state.write().await;
        match result {
            Ok(()) => match state.events.iter_mut().find(|e| e.id == event_id) {
                Some(event) => event.apply(&patch),
                None => debug!("Updated event {} is not in the snapshot", event_id),
            },
            Err(e) => record_failure(&mut state, &e, "update event"),
        }
        state.status.is_loading = false;
    }

    /// Delete an event known to the snapshot. Unknown ids fail with
    /// `Event not found` before anything external is called.
    pub async fn delete_event(&self, event_id: &str) {
        let Some(session) = self.session_for("delete event").await else {
            return;
        };

        self.begin().await;
        let existing = self
            .state
            .read()
            .await
            .events
            .iter()
            .find(|e| e.id == event_id)
            .cloned();

        let Some(event) = existing else {
            self.fail(AppError::not_found("Event not found"), "delete event").await;
            return;
        };

        let result = self.backend.delete_event(&session, &event).await;

        let mut state = self.state.write().await;
        match result {
            Ok(()) => state.events.retain(|e| e.id != event_id),
            Err(e) => record_failure(&mut state, &e, "delete event"),
        }
        state.status.is_loading = false;
    }

    pub async fn set_error(&self, error: Option<String>) {
        self.state.write().await.status.error = error;
    }

    pub async fn clear_error(&self) {
        self.set_error(None).await;
    }

    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.clone()
    }

    pub async fn status(&self) -> SyncStatus {
        self.state.read().await.status.clone()
    }

    pub async fn selection(&self) -> SelectionState {
        self.state.read().await.selection.clone()
    }

    pub async fn has_selection(&self) -> bool {
        !self.state.read().await.selection.selected_calendars.is_empty()
    }

    /// Month grid around the selected date.
    pub async fn month_grid(&self) -> Vec<Week> {
        let date = self.state.read().await.selection.selected_date;
        views::month_grid(views::local_date(date, self.tz))
    }

    pub async fn events_on_day(&self, day: NaiveDate) -> Vec<CalendarEvent> {
        let state = self.state.read().await;
        views::events_on_day(day, &state.events, self.tz)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Events on the selected date.
    pub async fn events_on_selected_date(&self) -> Vec<CalendarEvent> {
        let date = self.state.read().await.selection.selected_date;
        self.events_on_day(views::local_date(date, self.tz)).await
    }

    /// Colour markers for `day`, taken from the selected calendars.
    pub async fn day_color_markers(&self, day: NaiveDate) -> Vec<String> {
        let state = self.state.read().await;
        views::day_color_markers(day, &state.events, &state.selection.selected_calendars, self.tz)
    }
}
