// file: src/database/calendars.rs
use crate::models::{Calendar, CalendarSource, CalendarSourceKind};
use anyhow::Result;
use sqlx::{FromRow, SqlitePool};

#[derive(Debug, FromRow)]
struct CalendarRecord {
    id: String,
    title: String,
    color: String,
    source_name: String,
    source_kind: String,
    is_primary: bool,
    allows_modifications: bool,
}

impl From<CalendarRecord> for Calendar {
    fn from(record: CalendarRecord) -> Self {
        Calendar {
            id: record.id,
            title: record.title,
            color: record.color,
            source: CalendarSource {
                name: record.source_name,
                kind: CalendarSourceKind::parse(&record.source_kind),
            },
            is_primary: record.is_primary,
            allows_modifications: record.allows_modifications,
        }
    }
}

const SELECT_CALENDAR: &str = "SELECT id, title, color, source_name, source_kind, is_primary, allows_modifications FROM calendars";

pub async fn add(pool: &SqlitePool, calendar: &Calendar, is_default: bool) -> Result<()> {
    if is_default {
        sqlx::query("UPDATE calendars SET is_default = 0 WHERE is_default = 1")
            .execute(pool)
            .await?;
    }

    sqlx::query(
        "INSERT INTO calendars (id, title, color, source_name, source_kind, is_primary, is_default, allows_modifications) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&calendar.id)
    .bind(&calendar.title)
    .bind(&calendar.color)
    .bind(&calendar.source.name)
    .bind(calendar.source.kind.as_str())
    .bind(calendar.is_primary)
    .bind(is_default)
    .bind(calendar.allows_modifications)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Calendar>> {
    let records = sqlx::query_as::<_, CalendarRecord>(&format!("{} ORDER BY created_at ASC, rowid ASC", SELECT_CALENDAR))
        .fetch_all(pool)
        .await?;

    Ok(records.into_iter().map(Calendar::from).collect())
}

pub async fn get_default(pool: &SqlitePool) -> Result<Option<Calendar>> {
    let record = sqlx::query_as::<_, CalendarRecord>(&format!("{} WHERE is_default = 1 LIMIT 1", SELECT_CALENDAR))
        .fetch_optional(pool)
        .await?;

    Ok(record.map(Calendar::from))
}
