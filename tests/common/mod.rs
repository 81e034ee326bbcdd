#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use milo_sync::backend::{BackendMode, CalendarBackend, CalendarLoad};
use milo_sync::gateway::{
    CalendarRow, EnergyLevelInsert, EnergyLevelRow, EventInsert, EventRow, EventUpdate, RemoteGateway,
};
use milo_sync::{AppError, AppResult, Calendar, CalendarEvent, CalendarSource, CalendarSourceKind, Database, EventPatch, NewEvent, Session, SessionStore};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::NamedTempFile;
use tokio::sync::Notify;

pub fn session() -> Session {
    Session::new("user-1", "token")
}

pub fn signed_in() -> SessionStore {
    SessionStore::with_session(session())
}

pub fn device_calendar(id: &str, color: &str, is_primary: bool) -> Calendar {
    Calendar {
        id: id.to_string(),
        title: format!("Calendar {}", id),
        color: color.to_string(),
        source: CalendarSource {
            name: "Local".to_string(),
            kind: CalendarSourceKind::Local,
        },
        is_primary,
        allows_modifications: true,
    }
}

pub fn calendar_row(id: &str, color: &str) -> CalendarRow {
    CalendarRow {
        id: id.to_string(),
        title: format!("Calendar {}", id),
        color: color.to_string(),
        source: "system".to_string(),
        user_id: "user-1".to_string(),
        created_at: None,
    }
}

pub fn event_row(id: &str, calendar_id: &str, start: DateTime<Utc>) -> EventRow {
    EventRow {
        id: id.to_string(),
        title: format!("Event {}", id),
        description: None,
        start_date: start,
        end_date: start + Duration::hours(1),
        location: None,
        calendar_id: calendar_id.to_string(),
        user_id: "user-1".to_string(),
        created_at: None,
    }
}

pub async fn temp_database() -> Database {
    let temp_file = NamedTempFile::new().unwrap();
    let (_, path) = temp_file.keep().unwrap();
    Database::new(&path).await.unwrap()
}

/// Reads an event row straight from the device store.
pub async fn stored_event(db: &Database, id: &str) -> Option<CalendarEvent> {
    sqlx::query_as::<_, CalendarEvent>(
        "SELECT id, title, notes, start_date, end_date, location, calendar_id FROM events WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(&db.pool)
    .await
    .unwrap()
}

/// In-memory stand-in for the hosted tables.
#[derive(Default)]
pub struct FakeGateway {
    pub calendars: Mutex<Vec<CalendarRow>>,
    pub events: Mutex<Vec<EventRow>>,
    pub energy: Mutex<Vec<EnergyLevelRow>>,
    pub calls: AtomicUsize,
    next_id: AtomicUsize,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(calendars: Vec<CalendarRow>, events: Vec<EventRow>) -> Self {
        let gateway = Self::new();
        *gateway.calendars.lock().unwrap() = calendars;
        *gateway.events.lock().unwrap() = events;
        gateway
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn assign_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

#[async_trait]
impl RemoteGateway for FakeGateway {
    async fn list_calendars(&self, session: &Session) -> AppResult<Vec<CalendarRow>> {
        self.touch();
        Ok(self
            .calendars
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == session.user_id)
            .cloned()
            .collect())
    }

    async fn find_calendar(&self, _session: &Session, id: &str) -> AppResult<Option<CalendarRow>> {
        self.touch();
        Ok(self.calendars.lock().unwrap().iter().find(|row| row.id == id).cloned())
    }

    async fn insert_calendar(&self, _session: &Session, row: &CalendarRow) -> AppResult<()> {
        self.touch();
        self.calendars.lock().unwrap().push(row.clone());
        Ok(())
    }

    async fn list_events(&self, session: &Session, calendar_ids: &[String]) -> AppResult<Vec<EventRow>> {
        self.touch();
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == session.user_id && calendar_ids.contains(&row.calendar_id))
            .cloned()
            .collect())
    }

    async fn find_event(&self, session: &Session, id: &str) -> AppResult<Option<EventRow>> {
        self.touch();
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.id == id && row.user_id == session.user_id)
            .cloned())
    }

    async fn insert_event(&self, _session: &Session, row: &EventInsert) -> AppResult<EventRow> {
        self.touch();
        let stored = EventRow {
            id: row.id.clone().unwrap_or_else(|| self.assign_id("gw")),
            title: row.title.clone(),
            description: row.description.clone(),
            start_date: row.start_date,
            end_date: row.end_date,
            location: row.location.clone(),
            calendar_id: row.calendar_id.clone(),
            user_id: row.user_id.clone(),
            created_at: Some(Utc::now()),
        };
        self.events.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update_event(&self, session: &Session, id: &str, changes: &EventUpdate) -> AppResult<()> {
        self.touch();
        let mut events = self.events.lock().unwrap();
        if let Some(row) = events.iter_mut().find(|r| r.id == id && r.user_id == session.user_id) {
            if let Some(title) = &changes.title {
                row.title = title.clone();
            }
            if let Some(description) = &changes.description {
                row.description = description.clone();
            }
            if let Some(start) = changes.start_date {
                row.start_date = start;
            }
            if let Some(end) = changes.end_date {
                row.end_date = end;
            }
            if let Some(location) = &changes.location {
                row.location = location.clone();
            }
            if let Some(calendar_id) = &changes.calendar_id {
                row.calendar_id = calendar_id.clone();
            }
        }
        Ok(())
    }

    async fn delete_event(&self, session: &Session, id: &str) -> AppResult<()> {
        self.touch();
        self.events
            .lock()
            .unwrap()
            .retain(|r| !(r.id == id && r.user_id == session.user_id));
        Ok(())
    }

    async fn list_energy_levels(&self, session: &Session) -> AppResult<Vec<EnergyLevelRow>> {
        self.touch();
        Ok(self
            .energy
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.user_id == session.user_id)
            .cloned()
            .collect())
    }

    async fn insert_energy_level(&self, _session: &Session, row: &EnergyLevelInsert) -> AppResult<EnergyLevelRow> {
        self.touch();
        let stored = EnergyLevelRow {
            id: self.assign_id("energy"),
            level: row.level.clone(),
            description: row.description.clone(),
            timestamp: row.timestamp,
            user_id: row.user_id.clone(),
            created_at: Some(Utc::now()),
        };
        self.energy.lock().unwrap().push(stored.clone());
        Ok(stored)
    }
}

/// Backend whose `fetch_events` parks until released, for overlap tests.
pub struct GatedBackend {
    pub calendars: Vec<Calendar>,
    pub events: Vec<CalendarEvent>,
    pub fetch_calls: AtomicUsize,
    pub other_calls: AtomicUsize,
    pub fetch_started: Notify,
    pub release: Notify,
}

impl GatedBackend {
    pub fn new(calendars: Vec<Calendar>, events: Vec<CalendarEvent>) -> Self {
        Self {
            calendars,
            events,
            fetch_calls: AtomicUsize::new(0),
            other_calls: AtomicUsize::new(0),
            fetch_started: Notify::new(),
            release: Notify::new(),
        }
    }
}

#[async_trait]
impl CalendarBackend for GatedBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Mirrored
    }

    async fn load_calendars(&self, _session: &Session) -> AppResult<CalendarLoad> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        Ok(CalendarLoad {
            calendars: self.calendars.clone(),
            selection: self.calendars.first().cloned().into_iter().collect(),
        })
    }

    async fn fetch_events(&self, _session: &Session, _selected: &[Calendar]) -> AppResult<Vec<CalendarEvent>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_started.notify_one();
        self.release.notified().await;
        Ok(self.events.clone())
    }

    async fn create_event(&self, _session: &Session, _calendar_id: &str, _event: &NewEvent) -> AppResult<CalendarEvent> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::gateway("not supported by this backend"))
    }

    async fn update_event(
        &self,
        _session: &Session,
        _event_id: &str,
        _calendar_id: Option<String>,
        _patch: &EventPatch,
    ) -> AppResult<()> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_event(&self, _session: &Session, _event: &CalendarEvent) -> AppResult<()> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
