// file: src/database/settings.rs
use crate::models::{Setting, Settings};
use anyhow::Result;
use sqlx::SqlitePool;

pub async fn get(pool: &SqlitePool) -> Result<Settings> {
    let rows = sqlx::query_as::<_, Setting>("SELECT key, value FROM settings")
        .fetch_all(pool)
        .await?;

    let mut settings = Settings::default();
    for setting in rows {
        match setting.key.as_str() {
            "sync_interval" => settings.sync_interval = setting.value.parse().unwrap_or(300),
            "timezone" => settings.timezone = setting.value,
            "calendar_access" => settings.calendar_access = setting.value.parse().unwrap_or(true),
            _ => {}
        }
    }

    Ok(settings)
}

pub async fn update(pool: &SqlitePool, settings: &Settings) -> Result<()> {
    let sync_interval = settings.sync_interval.to_string();
    let calendar_access = settings.calendar_access.to_string();

    let updates = [
        ("sync_interval", sync_interval.as_str()),
        ("timezone", settings.timezone.as_str()),
        ("calendar_access", calendar_access.as_str()),
    ];

    for (key, value) in updates {
        sqlx::query("INSERT INTO settings (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value")
            .bind(key)
            .bind(value)
            .execute(pool)
            .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::run_schema;
    use tempfile::NamedTempFile;

    async fn setup_test_db() -> SqlitePool {
        let temp_file = NamedTempFile::new().unwrap();
        let (_, path) = temp_file.keep().unwrap();
        let pool = SqlitePool::connect(&format!("sqlite:{}", path.to_str().unwrap()))
            .await
            .unwrap();
        run_schema(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn test_get_settings_default() {
        let pool = setup_test_db().await;
        let settings = get(&pool).await.unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[tokio::test]
    async fn test_update_settings() {
        let pool = setup_test_db().await;
        let settings = Settings {
            sync_interval: 60,
            timezone: "Europe/Berlin".to_string(),
            calendar_access: false,
        };

        update(&pool, &settings).await.unwrap();
        assert_eq!(get(&pool).await.unwrap(), settings);
    }

    #[tokio::test]
    async fn test_unparseable_values_fall_back() {
        let pool = setup_test_db().await;
        sqlx::query("UPDATE settings SET value = 'soon' WHERE key = 'sync_interval'")
            .execute(&pool)
            .await
            .unwrap();

        assert_eq!(get(&pool).await.unwrap().sync_interval, 300);
    }
}
