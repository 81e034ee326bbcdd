//! Gateway-only backend, used when no device calendar store is available.

use super::{BackendMode, CalendarBackend, CalendarLoad};
use crate::auth::Session;
use crate::error::AppResult;
use crate::gateway::{CalendarRow, EventInsert, EventUpdate, EventRow, RemoteGateway};
use crate::models::{Calendar, CalendarEvent, EventPatch, NewEvent};
use crate::selection;
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

pub struct MirroredBackend {
    gateway: Arc<dyn RemoteGateway>,
}

impl MirroredBackend {
    pub fn new(gateway: Arc<dyn RemoteGateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl CalendarBackend for MirroredBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Mirrored
    }

    async fn load_calendars(&self, session: &Session) -> AppResult<CalendarLoad> {
        let calendars: Vec<Calendar> = self
            .gateway
            .list_calendars(session)
            .await?
            .into_iter()
            .map(CalendarRow::into_calendar)
            .collect();

        let selection = selection::initial_mirrored_selection(&calendars);
        Ok(CalendarLoad { calendars, selection })
    }

    async fn fetch_events(&self, session: &Session, selected: &[Calendar]) -> AppResult<Vec<CalendarEvent>> {
        let ids: Vec<String> = selected.iter().map(|c| c.id.clone()).collect();
        let rows = self.gateway.list_events(session, &ids).await?;
        debug!("Gateway returned {} events for {} calendars", rows.len(), ids.len());
        Ok(rows.into_iter().map(EventRow::into_event).collect())
    }

    async fn create_event(&self, session: &Session, calendar_id: &str, event: &NewEvent) -> AppResult<CalendarEvent> {
        let row = EventInsert {
            id: None,
            title: event.title.clone(),
            description: event.notes.clone(),
            start_date: event.start_date,
            end_date: event.end_date,
            location: event.location.clone(),
            calendar_id: calendar_id.to_string(),
            user_id: session.user_id.clone(),
        };

        let stored = self.gateway.insert_event(session, &row).await?;
        Ok(stored.into_event())
    }

    async fn update_event(
        &self,
        session: &Session,
        event_id: &str,
        _calendar_id: Option<String>,
        patch: &EventPatch,
    ) -> AppResult<()> {
        self.gateway
            .update_event(session, event_id, &EventUpdate::from(patch))
            .await
    }

    async fn delete_event(&self, session: &Session, event: &CalendarEvent) -> AppResult<()> {
        self.gateway.delete_event(session, &event.id).await
    }
}
