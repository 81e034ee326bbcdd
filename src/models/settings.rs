// file: src/models/settings.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub sync_interval: i32,      // seconds
    pub timezone: String,        // IANA name
    pub calendar_access: bool,   // device calendar permission
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sync_interval: 300, // 5 minutes
            timezone: "UTC".to_string(),
            calendar_access: true,
        }
    }
}
