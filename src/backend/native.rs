//! Device-backed calendars with passive gateway mirrors.

use super::{BackendMode, CalendarBackend, CalendarLoad};
use crate::auth::Session;
use crate::device::{DeviceCalendarProvider, PermissionStatus};
use crate::error::{AppError, AppResult};
use crate::gateway::mirror::{self, MirrorOutcome};
use crate::gateway::RemoteGateway;
use crate::models::{Calendar, CalendarEvent, EventPatch, NewEvent};
use crate::selection;
use crate::utils;
use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use log::{debug, info};
use std::sync::Arc;

pub const SYNC_DAYS_AHEAD: i64 = 30;

/// `[first day of the current month at local midnight, now + 30 days]`.
pub fn sync_window(now: DateTime<Utc>, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let local = now.with_timezone(&tz);
    let start = NaiveDate::from_ymd_opt(local.year(), local.month(), 1)
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .and_then(|midnight| tz.from_local_datetime(&midnight).earliest())
        .map(|start| start.with_timezone(&Utc))
        .unwrap_or(now);

    (start, now + Duration::days(SYNC_DAYS_AHEAD))
}

pub struct NativeDeviceBackend {
    device: Arc<dyn DeviceCalendarProvider>,
    gateway: Arc<dyn RemoteGateway>,
    tz: Tz,
}

impl NativeDeviceBackend {
    pub fn new(device: Arc<dyn DeviceCalendarProvider>, gateway: Arc<dyn RemoteGateway>, tz: Tz) -> Self {
        Self { device, gateway, tz }
    }
}

#[async_trait]
impl CalendarBackend for NativeDeviceBackend {
    fn mode(&self) -> BackendMode {
        BackendMode::Native
    }

    async fn load_calendars(&self, session: &Session) -> AppResult<CalendarLoad> {
        if self.device.request_permission().await? == PermissionStatus::Denied {
            return Err(AppError::permission_denied("Calendar permission not granted"));
        }

        let (default, calendars) = tokio::try_join!(self.device.default_calendar(), self.device.calendars())?;

        let mut inserted = 0;
        for calendar in &calendars {
            if mirror::mirror_calendar(self.gateway.as_ref(), session, calendar).await? == MirrorOutcome::Inserted {
                inserted += 1;
            }
        }
        if inserted > 0 {
            info!("Mirrored {} new device calendars", inserted);
        }

        let selection = selection::initial_native_selection(default.as_ref(), &calendars);
        Ok(CalendarLoad { calendars, selection })
    }

    async fn fetch_events(&self, session: &Session, selected: &[Calendar]) -> AppResult<Vec<CalendarEvent>> {
        let (start, end) = sync_window(Utc::now(), self.tz);
        let mut events = Vec::new();

        for calendar in selected {
            let found = self
                .device
                .events(std::slice::from_ref(&calendar.id), start, end)
                .await?;
            debug!("Device returned {} events for calendar {}", found.len(), calendar.id);

            for event in &found {
                mirror::mirror_event(self.gateway.as_ref(), session, event, &calendar.id).await?;
            }
            events.extend(found);
        }

        Ok(events)
    }

    async fn create_event(&self, session: &Session, calendar_id: &str, event: &NewEvent) -> AppResult<CalendarEvent> {
        let mut event = event.clone();
        event.title = utils::normalize_title(&event.title);

        let id = self.device.create_event(calendar_id, &event).await?;
        let created = event.into_event(id, calendar_id.to_string());

        mirror::mirror_event(self.gateway.as_ref(), session, &created, calendar_id).await?;
        Ok(created)
    }

    async fn update_event(
        &self,
        _session: &Session,
        event_id: &str,
        calendar_id: Option<String>,
        patch: &EventPatch,
    ) -> AppResult<()> {
        let calendar_id = patch
            .calendar_id
            .clone()
            .or(calendar_id)
            .ok_or_else(|| AppError::not_found("Event not found"))?;

        self.device.update_event(&calendar_id, event_id, patch).await
    }

    async fn delete_event(&self, _session: &Session, event: &CalendarEvent) -> AppResult<()> {
        self.device.delete_event(&event.calendar_id, &event.id).await
    }
}
