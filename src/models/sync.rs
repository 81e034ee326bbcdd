// file: src/models/sync.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Flags and last error the engine exposes to screens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub is_loading: bool,
    pub sync_in_progress: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResult {
    pub success: bool,
    /// True when the run was dropped because another sync was in flight.
    pub skipped: bool,
    pub events_synced: usize,
    pub error_message: Option<String>,
    pub sync_time: DateTime<Utc>,
}

impl SyncResult {
    pub fn with_count(events_synced: usize) -> Self {
        Self {
            success: true,
            skipped: false,
            events_synced,
            error_message: None,
            sync_time: Utc::now(),
        }
    }

    pub fn skipped() -> Self {
        Self {
            success: false,
            skipped: true,
            events_synced: 0,
            error_message: None,
            sync_time: Utc::now(),
        }
    }

    pub fn with_error(error: String) -> Self {
        Self {
            success: false,
            skipped: false,
            events_synced: 0,
            error_message: Some(error),
            sync_time: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_result_with_count() {
        let result = SyncResult::with_count(5);
        assert!(result.success);
        assert!(!result.skipped);
        assert_eq!(result.events_synced, 5);
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_sync_result_skipped() {
        let result = SyncResult::skipped();
        assert!(!result.success);
        assert!(result.skipped);
        assert!(result.error_message.is_none());
    }

    #[test]
    fn test_sync_result_with_error() {
        let result = SyncResult::with_error("No calendars selected".to_string());
        assert!(!result.success);
        assert!(!result.skipped);
        assert_eq!(result.error_message, Some("No calendars selected".to_string()));
    }

    #[test]
    fn test_status_default_is_idle() {
        let status = SyncStatus::default();
        assert!(!status.is_loading);
        assert!(!status.sync_in_progress);
        assert!(status.error.is_none());
    }
}
