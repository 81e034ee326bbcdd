// file: src/database/mod.rs

use crate::device::{DeviceCalendarProvider, PermissionStatus};
use crate::error::{AppError, AppResult};
use crate::models::{Calendar, CalendarEvent, EventPatch, NewEvent, Settings};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePool, Row, Sqlite};
use std::path::Path;

pub mod calendars;
pub mod events;
pub mod settings;

/// Local calendar store. Doubles as the device calendar provider on
/// desktop builds.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let db_url = format!("sqlite:{}?mode=rwc", path.display());

        let db_exists = Sqlite::database_exists(&db_url)
            .await
            .context("Failed to check if database exists")?;
        if !db_exists {
            info!("Creating calendar store at {}", path.display());
            Sqlite::create_database(&db_url)
                .await
                .context("Failed to create database")?;
        }

        let pool = SqlitePool::connect(&db_url)
            .await
            .context("Failed to connect to database")?;

        run_schema(&pool).await.context("Failed to run database schema")?;
        ensure_migrations(&pool).await.context("Failed to ensure migrations")?;

        info!("Database initialized successfully");

        Ok(Database { pool })
    }

    // --- Calendar Delegates ---

    pub async fn add_calendar(&self, calendar: &Calendar, is_default: bool) -> Result<()> {
        calendars::add(&self.pool, calendar, is_default).await
    }

    pub async fn get_calendars(&self) -> Result<Vec<Calendar>> {
        calendars::get_all(&self.pool).await
    }

    pub async fn get_default_calendar(&self) -> Result<Option<Calendar>> {
        calendars::get_default(&self.pool).await
    }

    // --- Settings Delegates ---

    pub async fn get_settings(&self) -> Result<Settings> {
        settings::get(&self.pool).await
    }

    pub async fn update_settings(&self, settings: &Settings) -> Result<()> {
        settings::update(&self.pool, settings).await
    }
}

fn provider_error(err: anyhow::Error) -> AppError {
    AppError::provider(format!("{:#}", err))
}

#[async_trait]
impl DeviceCalendarProvider for Database {
    async fn request_permission(&self) -> AppResult<PermissionStatus> {
        let settings = self.get_settings().await.map_err(provider_error)?;
        Ok(if settings.calendar_access {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }

    async fn default_calendar(&self) -> AppResult<Option<Calendar>> {
        self.get_default_calendar().await.map_err(provider_error)
    }

    async fn calendars(&self) -> AppResult<Vec<Calendar>> {
        self.get_calendars().await.map_err(provider_error)
    }

    async fn events(
        &self,
        calendar_ids: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AppResult<Vec<CalendarEvent>> {
        events::get_in_range(&self.pool, calendar_ids, start, end)
            .await
            .map_err(provider_error)
    }

    async fn create_event(&self, calendar_id: &str, event: &NewEvent) -> AppResult<String> {
        let id = events::insert(&self.pool, calendar_id, event)
            .await
            .map_err(provider_error)?;
        debug!("Stored event {} in calendar {}", id, calendar_id);
        Ok(id)
    }

    async fn update_event(&self, calendar_id: &str, event_id: &str, patch: &EventPatch) -> AppResult<()> {
        events::update(&self.pool, calendar_id, event_id, patch)
            .await
            .map_err(provider_error)
    }

    async fn delete_event(&self, calendar_id: &str, event_id: &str) -> AppResult<()> {
        events::delete(&self.pool, calendar_id, event_id)
            .await
            .map_err(provider_error)
    }
}

pub(crate) async fn run_schema(pool: &SqlitePool) -> Result<()> {
    let schema = include_str!("schema.sql");

    let mut current_statement = String::new();
    let mut in_trigger = false;

    for line in schema.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") || trimmed.is_empty() {
            continue;
        }

        if trimmed.to_uppercase().starts_with("CREATE TRIGGER") {
            in_trigger = true;
        }

        current_statement.push_str(line);
        current_statement.push('\n');

        if trimmed.ends_with(';') {
            // Trigger bodies contain ';' of their own
            if in_trigger {
                if trimmed.to_uppercase() == "END;" {
                    in_trigger = false;
                    sqlx::query(&current_statement).execute(pool).await?;
                    current_statement.clear();
                }
            } else {
                sqlx::query(&current_statement).execute(pool).await?;
                current_statement.clear();
            }
        }
    }
    Ok(())
}

async fn ensure_migrations(pool: &SqlitePool) -> Result<()> {
    let rows = sqlx::query("PRAGMA table_info(calendars)")
        .fetch_all(pool)
        .await
        .context("Failed to fetch table info")?;

    let columns: Vec<String> = rows
        .iter()
        .map(|row| row.get::<String, _>("name"))
        .collect();

    if !columns.contains(&"is_default".to_string()) {
        info!("Migrating: Adding is_default column to calendars table");
        sqlx::query("ALTER TABLE calendars ADD COLUMN is_default BOOLEAN NOT NULL DEFAULT 0")
            .execute(pool)
            .await
            .context("Failed to add is_default column")?;
    }

    if !columns.contains(&"allows_modifications".to_string()) {
        info!("Migrating: Adding allows_modifications column to calendars table");
        sqlx::query("ALTER TABLE calendars ADD COLUMN allows_modifications BOOLEAN NOT NULL DEFAULT 1")
            .execute(pool)
            .await
            .context("Failed to add allows_modifications column")?;
    }

    Ok(())
}
