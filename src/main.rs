// Milo Sync - headless calendar synchronization daemon

use log::{error, info, warn};
use milo_sync::config::{self, AppConfig, Credentials};
use milo_sync::scheduler;
use milo_sync::utils::logging;
use milo_sync::{AppResult, AppState, Session, SessionStore};

#[tokio::main]
async fn main() {
    logging::init_logging();
    info!("Starting milo-sync {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        logging::log_error_with_context(&e, "startup");
        error!("milo-sync stopped: {}", e.to_safe_string());
        std::process::exit(1);
    }
}

async fn run() -> AppResult<()> {
    let config = AppConfig::from_env()?;
    config::validate_config(&config)?;

    let sessions = SessionStore::new();
    let state = AppState::build(&config, sessions.clone()).await?;
    info!("Using {} calendar backend", state.engine.mode());

    match &config.credentials {
        Credentials::Token { user_id, access_token } => {
            sessions.sign_in(Session::new(user_id.clone(), access_token.clone())).await;
        }
        Credentials::Password { email, password } => {
            let session = state.gateway.sign_in_with_password(email, password).await?;
            sessions.sign_in(session).await;
        }
        Credentials::None => {
            warn!("No credentials configured; operations will report 'Authentication required'");
        }
    }

    state.engine.load_calendars().await;
    let result = state.engine.sync_local_calendars().await;
    if result.success {
        info!("Initial sync: {} events", result.events_synced);
    }
    if let Some(message) = state.engine.status().await.error {
        warn!("Engine reported: {}", message);
    }

    if sessions.is_authenticated().await {
        let today = chrono::Utc::now().with_timezone(&state.engine.time_zone()).date_naive();
        state.energy.log_summary(today).await;
    }

    let sync_task = tokio::spawn(scheduler::run_sync_loop(
        state.engine.clone(),
        state.sync_interval,
        state.shutdown.clone(),
    ));

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
    }
    state.shutdown.cancel();

    if let Err(e) = sync_task.await {
        error!("Sync loop task failed: {}", e);
    }

    sessions.sign_out().await;
    info!("milo-sync stopped");
    Ok(())
}
