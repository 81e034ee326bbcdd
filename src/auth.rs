//! Authenticated-user context
//!
//! The engine never talks to the authentication provider itself; it only
//! reads whichever session is currently installed here. Sign-in flows
//! (see `RestGateway::sign_in_with_password`) install sessions, sign-out
//! clears them.

use crate::error::{AppError, AppResult};
use crate::utils::logging;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
    pub email: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
            email: None,
        }
    }
}

/// Shared holder for the current session.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
        }
    }

    pub async fn sign_in(&self, session: Session) {
        logging::log_auth_event("Signed in", &session.user_id);
        *self.inner.write().await = Some(session);
    }

    pub async fn sign_out(&self) {
        if let Some(session) = self.inner.write().await.take() {
            logging::log_auth_event("Signed out", &session.user_id);
        }
    }

    pub async fn current(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Current session or `AuthenticationRequired`.
    pub async fn require(&self) -> AppResult<Session> {
        self.current().await.ok_or(AppError::AuthenticationRequired)
    }
}
