//! Configuration
//!
//! Everything comes from `MILO_*` environment variables. Defaults cover
//! all but the gateway URL and key. The time zone and sync interval fall
//! back to the device store's settings when the environment leaves them
//! unset.

use crate::backend::BackendMode;
use crate::error::{AppError, AppResult};
use crate::models::Settings;
use crate::utils;
use chrono_tz::Tz;
use log::info;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// How the daemon obtains its session at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    Token { user_id: String, access_token: String },
    Password { email: String, password: String },
    None,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backend: BackendMode,
    pub gateway_url: String,
    pub gateway_key: String,
    pub db_path: PathBuf,
    pub timezone: Option<String>,
    pub sync_interval_secs: Option<u64>,
    pub credentials: Credentials,
}

fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(key: &str) -> AppResult<String> {
    var(key).ok_or_else(|| AppError::config(format!("{} must be set", key)))
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("milo")
        .join("milo.db")
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        let backend = match var("MILO_BACKEND") {
            Some(mode) => mode.parse()?,
            None => BackendMode::Native,
        };

        let sync_interval_secs = match var("MILO_SYNC_INTERVAL") {
            Some(raw) => Some(
                raw.parse()
                    .map_err(|_| AppError::config(format!("MILO_SYNC_INTERVAL is not a number: {}", raw)))?,
            ),
            None => None,
        };

        let credentials = match (var("MILO_USER_ID"), var("MILO_ACCESS_TOKEN")) {
            (Some(user_id), Some(access_token)) => Credentials::Token { user_id, access_token },
            _ => match (var("MILO_EMAIL"), var("MILO_PASSWORD")) {
                (Some(email), Some(password)) => Credentials::Password { email, password },
                _ => Credentials::None,
            },
        };

        Ok(Self {
            backend,
            gateway_url: required("MILO_GATEWAY_URL")?,
            gateway_key: required("MILO_GATEWAY_KEY")?,
            db_path: var("MILO_DB_PATH").map(PathBuf::from).unwrap_or_else(default_db_path),
            timezone: var("MILO_TIMEZONE"),
            sync_interval_secs,
            credentials,
        })
    }

    /// Fill the values the environment left unset from persisted settings.
    /// A non-positive stored interval is ignored.
    pub fn with_stored_settings(mut self, settings: &Settings) -> Self {
        if self.timezone.is_none() {
            self.timezone = Some(settings.timezone.clone());
        }
        if self.sync_interval_secs.is_none() && settings.sync_interval > 0 {
            self.sync_interval_secs = Some(settings.sync_interval as u64);
        }
        self
    }

    pub fn time_zone(&self) -> AppResult<Tz> {
        let name = self.timezone.as_deref().unwrap_or(DEFAULT_TIMEZONE);
        name.parse::<Tz>()
            .map_err(|_| AppError::config(format!("Unknown time zone '{}'", name)))
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_secs.unwrap_or(DEFAULT_SYNC_INTERVAL_SECS))
    }
}

/// Reject configurations the daemon cannot run with.
pub fn validate_config(config: &AppConfig) -> AppResult<()> {
    utils::validate_gateway_url(&config.gateway_url).map_err(|e| AppError::config(e.to_string()))?;
    let tz = config.time_zone()?;

    if config.sync_interval_secs == Some(0) {
        return Err(AppError::config("MILO_SYNC_INTERVAL must be greater than zero"));
    }

    info!(
        "Configuration valid ({} backend, time zone {}, sync every {}s)",
        config.backend,
        tz,
        config.sync_interval().as_secs()
    );
    Ok(())
}
