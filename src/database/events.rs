// file: src/database/events.rs
use crate::models::{CalendarEvent, EventPatch, NewEvent};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

pub async fn get_in_range(
    pool: &SqlitePool,
    calendar_ids: &[String],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<CalendarEvent>> {
    if calendar_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT id, title, notes, start_date, end_date, location, calendar_id FROM events WHERE calendar_id IN (",
    );
    let mut ids = query.separated(", ");
    for id in calendar_ids {
        ids.push_bind(id);
    }
    ids.push_unseparated(") AND start_date >= ");
    query.push_bind(start);
    query.push(" AND start_date <= ");
    query.push_bind(end);
    query.push(" ORDER BY start_date ASC");

    let events = query
        .build_query_as::<CalendarEvent>()
        .fetch_all(pool)
        .await?;

    Ok(events)
}

/// Stores a new event and returns its generated id.
pub async fn insert(pool: &SqlitePool, calendar_id: &str, event: &NewEvent) -> Result<String> {
    let id = uuid::Uuid::new_v4().to_string();

    sqlx::query(
        "INSERT INTO events (id, calendar_id, title, notes, start_date, end_date, location) VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(calendar_id)
    .bind(crate::utils::normalize_title(&event.title))
    .bind(&event.notes)
    .bind(event.start_date)
    .bind(event.end_date)
    .bind(&event.location)
    .execute(pool)
    .await?;

    Ok(id)
}

pub async fn update(pool: &SqlitePool, calendar_id: &str, event_id: &str, patch: &EventPatch) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE events SET
            title = COALESCE(?, title),
            notes = COALESCE(?, notes),
            start_date = COALESCE(?, start_date),
            end_date = COALESCE(?, end_date),
            location = COALESCE(?, location),
            calendar_id = COALESCE(?, calendar_id)
        WHERE id = ? AND calendar_id = ?
        "#,
    )
    .bind(&patch.title)
    .bind(&patch.notes)
    .bind(patch.start_date)
    .bind(patch.end_date)
    .bind(&patch.location)
    .bind(&patch.calendar_id)
    .bind(event_id)
    .bind(calendar_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(anyhow!("Event {} not found in calendar {}", event_id, calendar_id));
    }

    Ok(())
}

pub async fn delete(pool: &SqlitePool, calendar_id: &str, event_id: &str) -> Result<()> {
    let result = sqlx::query("DELETE FROM events WHERE id = ? AND calendar_id = ?")
        .bind(event_id)
        .bind(calendar_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(anyhow!("Event {} not found in calendar {}", event_id, calendar_id));
    }

    Ok(())
}
