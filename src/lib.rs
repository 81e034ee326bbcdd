// Milo Sync Library
// Calendar synchronization core: device calendars, the hosted gateway
// mirror, selection state and the views derived from them.

pub mod auth;
pub mod backend;
pub mod config;
pub mod database;
pub mod device;
pub mod energy;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod http_config;
pub mod models;
pub mod scheduler;
pub mod selection;
pub mod utils;
pub mod views;

// Re-export commonly used types
pub use auth::{Session, SessionStore};
pub use backend::{BackendMode, CalendarBackend, MirroredBackend, NativeDeviceBackend};
pub use database::Database;
pub use engine::{CalendarSyncEngine, Snapshot};
pub use error::{AppError, AppResult};
pub use models::*;
pub use selection::SelectionState;

use gateway::RestGateway;
use std::sync::Arc;
use std::time::Duration;

/// Services shared by the daemon's tasks.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<RestGateway>,
    pub engine: Arc<CalendarSyncEngine>,
    pub energy: Arc<energy::EnergyTracker>,
    pub sessions: SessionStore,
    pub sync_interval: Duration,
    pub shutdown: tokio_util::sync::CancellationToken,
}

impl AppState {
    /// Wire the gateway and the backend chosen by `config.backend`. In native
    /// mode the device store's settings supply the time zone and interval
    /// the environment left unset.
    pub async fn build(config: &config::AppConfig, sessions: SessionStore) -> AppResult<Self> {
        let gateway = Arc::new(RestGateway::new(
            &config.gateway_url,
            config.gateway_key.clone(),
            &http_config::HttpConfig::default(),
        )?);

        let mut config = config.clone();
        let device = match config.backend {
            BackendMode::Native => {
                let db = Database::new(&config.db_path).await?;
                config = config.with_stored_settings(&db.get_settings().await?);
                Some(db)
            }
            BackendMode::Mirrored => None,
        };

        let tz = config.time_zone()?;
        let backend: Arc<dyn CalendarBackend> = match device {
            Some(db) => Arc::new(NativeDeviceBackend::new(Arc::new(db), gateway.clone(), tz)),
            None => Arc::new(MirroredBackend::new(gateway.clone())),
        };

        Ok(Self {
            engine: Arc::new(CalendarSyncEngine::new(backend, sessions.clone(), tz)),
            energy: Arc::new(energy::EnergyTracker::new(gateway.clone(), sessions.clone(), tz)),
            gateway,
            sessions,
            sync_interval: config.sync_interval(),
            shutdown: tokio_util::sync::CancellationToken::new(),
        })
    }
}
