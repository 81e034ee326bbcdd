//! PostgREST-style client for the hosted backend.
//!
//! Tables live under `{base}/rest/v1/{table}`; password sign-in goes to
//! `{base}/auth/v1/token?grant_type=password`. Every request carries the
//! project's public `apikey` plus the session's bearer token.

use super::{
    CalendarRow, EnergyLevelInsert, EnergyLevelRow, EventInsert, EventRow, EventUpdate,
    RemoteGateway, CALENDARS_TABLE, ENERGY_LEVELS_TABLE, EVENTS_TABLE,
};
use crate::auth::Session;
use crate::error::{AppError, AppResult};
use crate::http_config::HttpConfig;
use crate::utils::{self, logging};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Instant;
use url::Url;

pub struct RestGateway {
    client: Client,
    base_url: Url,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(Debug, Deserialize)]
struct TokenUser {
    id: String,
    email: Option<String>,
}

pub(crate) fn eq_filter(value: &str) -> String {
    format!("eq.{}", value)
}

/// `in.("a","b")`, quoting each id so commas and parentheses survive.
pub(crate) fn in_filter(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

impl RestGateway {
    pub fn new(base_url: &str, api_key: impl Into<String>, http: &HttpConfig) -> AppResult<Self> {
        let mut base_url = utils::validate_gateway_url(base_url)
            .map_err(|e| AppError::config(e.to_string()))?;

        // Url::join replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = http.build_client()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> AppResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| AppError::config(format!("Invalid gateway path '{}': {}", path, e)))
    }

    fn table_request(&self, method: Method, table: &str, session: &Session) -> AppResult<RequestBuilder> {
        let url = self.endpoint(&format!("rest/v1/{}", table))?;
        Ok(self
            .client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token))
    }

    async fn check(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read error response".to_string());
        Err(AppError::gateway(format!("HTTP {}: {}", status, text)))
    }

    async fn fetch_rows<T: DeserializeOwned + Send>(
        &self,
        table: &str,
        session: &Session,
        filters: &[(&str, String)],
    ) -> AppResult<Vec<T>> {
        let started = Instant::now();
        let response = self
            .table_request(Method::GET, table, session)?
            .query(&[("select", "*")])
            .query(filters)
            .send()
            .await?;

        let rows = Self::check(response).await?.json::<Vec<T>>().await?;
        logging::log_gateway_operation("select", table, started.elapsed().as_millis() as u64);
        Ok(rows)
    }

    async fn insert_row<B: serde::Serialize + Sync, T: DeserializeOwned + Send>(
        &self,
        table: &str,
        session: &Session,
        body: &B,
    ) -> AppResult<T> {
        let started = Instant::now();
        let response = self
            .table_request(Method::POST, table, session)?
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let mut rows = Self::check(response).await?.json::<Vec<T>>().await?;
        logging::log_gateway_operation("insert", table, started.elapsed().as_millis() as u64);

        if rows.is_empty() {
            return Err(AppError::gateway(format!("Insert into {} returned no row", table)));
        }
        Ok(rows.swap_remove(0))
    }

    /// Exchange email/password for a session.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<Session> {
        let url = self.endpoint("auth/v1/token")?;
        let client = HttpConfig::auth().build_client()?;

        let response = client
            .post(url)
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::BAD_REQUEST
            || response.status() == reqwest::StatusCode::UNAUTHORIZED
        {
            return Err(AppError::AuthenticationRequired);
        }

        let token: TokenResponse = Self::check(response).await?.json().await?;
        logging::log_auth_event("Password sign-in", &token.user.id);

        Ok(Session {
            user_id: token.user.id,
            access_token: token.access_token,
            email: token.user.email.or_else(|| Some(email.to_string())),
        })
    }
}

#[async_trait]
impl RemoteGateway for RestGateway {
    async fn list_calendars(&self, session: &Session) -> AppResult<Vec<CalendarRow>> {
        self.fetch_rows(CALENDARS_TABLE, session, &[("user_id", eq_filter(&session.user_id))])
            .await
    }

    async fn find_calendar(&self, session: &Session, id: &str) -> AppResult<Option<CalendarRow>> {
        let rows: Vec<CalendarRow> = self
            .fetch_rows(CALENDARS_TABLE, session, &[("id", eq_filter(id))])
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_calendar(&self, session: &Session, row: &CalendarRow) -> AppResult<()> {
        let _: CalendarRow = self.insert_row(CALENDARS_TABLE, session, row).await?;
        Ok(())
    }

    async fn list_events(&self, session: &Session, calendar_ids: &[String]) -> AppResult<Vec<EventRow>> {
        if calendar_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.fetch_rows(
            EVENTS_TABLE,
            session,
            &[
                ("calendar_id", in_filter(calendar_ids)),
                ("user_id", eq_filter(&session.user_id)),
                ("order", "start_date.asc".to_string()),
            ],
        )
        .await
    }

    async fn find_event(&self, session: &Session, id: &str) -> AppResult<Option<EventRow>> {
        let rows: Vec<EventRow> = self
            .fetch_rows(
                EVENTS_TABLE,
                session,
                &[("id", eq_filter(id)), ("user_id", eq_filter(&session.user_id))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn insert_event(&self, session: &Session, row: &EventInsert) -> AppResult<EventRow> {
        self.insert_row(EVENTS_TABLE, session, row).await
    }

    async fn update_event(&self, session: &Session, id: &str, changes: &EventUpdate) -> AppResult<()> {
        let started = Instant::now();
        let response = self
            .table_request(Method::PATCH, EVENTS_TABLE, session)?
            .query(&[("id", eq_filter(id)), ("user_id", eq_filter(&session.user_id))])
            .json(changes)
            .send()
            .await?;

        Self::check(response).await?;
        logging::log_gateway_operation("update", EVENTS_TABLE, started.elapsed().as_millis() as u64);
        Ok(())
    }

    async fn delete_event(&self, session: &Session, id: &str) -> AppResult<()> {
        let started = Instant::now();
        let response = self
            .table_request(Method::DELETE, EVENTS_TABLE, session)?
            .query(&[("id", eq_filter(id)), ("user_id", eq_filter(&session.user_id))])
            .send()
            .await?;

        Self::check(response).await?;
        logging::log_gateway_operation("delete", EVENTS_TABLE, started.elapsed().as_millis() as u64);
        Ok(())
    }

    async fn list_energy_levels(&self, session: &Session) -> AppResult<Vec<EnergyLevelRow>> {
        self.fetch_rows(
            ENERGY_LEVELS_TABLE,
            session,
            &[
                ("user_id", eq_filter(&session.user_id)),
                ("order", "timestamp.asc".to_string()),
            ],
        )
        .await
    }

    async fn insert_energy_level(&self, session: &Session, row: &EnergyLevelInsert) -> AppResult<EnergyLevelRow> {
        self.insert_row(ENERGY_LEVELS_TABLE, session, row).await
    }
}
