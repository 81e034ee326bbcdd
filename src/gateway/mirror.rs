//! Keeps gateway-side copies of device calendars and events.

use super::{CalendarRow, EventInsert, EventUpdate, RemoteGateway};
use crate::auth::Session;
use crate::error::AppResult;
use crate::models::{Calendar, CalendarEvent};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorOutcome {
    Inserted,
    Updated,
    Unchanged,
}

/// Insert a mirror row for `calendar` unless one already exists.
/// Existing rows are never refreshed, even if the device metadata changed.
pub async fn mirror_calendar(
    gateway: &dyn RemoteGateway,
    session: &Session,
    calendar: &Calendar,
) -> AppResult<MirrorOutcome> {
    if gateway.find_calendar(session, &calendar.id).await?.is_some() {
        debug!("Calendar {} already mirrored", calendar.id);
        return Ok(MirrorOutcome::Unchanged);
    }

    gateway
        .insert_calendar(session, &CalendarRow::mirror_of(calendar, &session.user_id))
        .await?;
    debug!("Mirrored calendar {}", calendar.id);
    Ok(MirrorOutcome::Inserted)
}

/// Upsert a mirror row for `event`, always refreshing its contents.
pub async fn mirror_event(
    gateway: &dyn RemoteGateway,
    session: &Session,
    event: &CalendarEvent,
    calendar_id: &str,
) -> AppResult<MirrorOutcome> {
    let row = EventInsert::mirror_of(event, calendar_id, &session.user_id);

    if gateway.find_event(session, &event.id).await?.is_some() {
        gateway
            .update_event(session, &event.id, &EventUpdate::from(row))
            .await?;
        Ok(MirrorOutcome::Updated)
    } else {
        gateway.insert_event(session, &row).await?;
        Ok(MirrorOutcome::Inserted)
    }
}
