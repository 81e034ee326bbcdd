//! Energy tracking over the gateway's `energy_levels` table.

use crate::auth::SessionStore;
use crate::error::{AppError, AppResult};
use crate::gateway::{EnergyLevelInsert, RemoteGateway};
use crate::models::{EnergyLevel, EnergyLevelKind, Recommendation};
use crate::views;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use log::{info, warn};
use std::sync::Arc;

pub struct EnergyTracker {
    gateway: Arc<dyn RemoteGateway>,
    sessions: SessionStore,
    tz: Tz,
}

impl EnergyTracker {
    pub fn new(gateway: Arc<dyn RemoteGateway>, sessions: SessionStore, tz: Tz) -> Self {
        Self { gateway, sessions, tz }
    }

    /// Record how the user feels right now.
    pub async fn record(&self, level: EnergyLevelKind, description: Option<String>) -> AppResult<EnergyLevel> {
        let session = self.sessions.require().await?;
        let row = EnergyLevelInsert {
            level: level.as_str().to_string(),
            description,
            timestamp: Utc::now(),
            user_id: session.user_id.clone(),
        };

        let stored = self.gateway.insert_energy_level(&session, &row).await?;
        info!("Recorded {} energy for user '{}'", level.as_str(), session.user_id);
        stored.into_energy_level().map_err(AppError::gateway)
    }

    /// Every entry for the user, oldest first. Rows with an unknown level
    /// are skipped.
    pub async fn history(&self) -> AppResult<Vec<EnergyLevel>> {
        let session = self.sessions.require().await?;
        let rows = self.gateway.list_energy_levels(&session).await?;

        let mut levels: Vec<EnergyLevel> = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                match row.into_energy_level() {
                    Ok(level) => Some(level),
                    Err(e) => {
                        warn!("Skipping energy entry {}: {}", id, e);
                        None
                    }
                }
            })
            .collect();
        levels.sort_by_key(|level| level.timestamp);
        Ok(levels)
    }

    /// Entries recorded on `date` in the tracker's time zone.
    pub async fn todays_log(&self, date: NaiveDate) -> AppResult<Vec<EnergyLevel>> {
        let tz = self.tz;
        Ok(self
            .history()
            .await?
            .into_iter()
            .filter(|level| views::local_date(level.timestamp, tz) == date)
            .collect())
    }

    pub async fn current_level(&self) -> AppResult<Option<EnergyLevel>> {
        Ok(self.history().await?.pop())
    }

    /// Log the current level and today's recommendations. A failed read is
    /// logged as a warning and yields no recommendations.
    pub async fn log_summary(&self, today: NaiveDate) -> Vec<Recommendation> {
        let history = match self.history().await {
            Ok(history) => history,
            Err(e) => {
                warn!("Could not read energy log: {}", e.to_safe_string());
                return Vec::new();
            }
        };

        let Some(current) = history.last() else {
            info!("No energy entries recorded yet");
            return Vec::new();
        };
        info!("Current energy level: {}", current.level.as_str());

        let tz = self.tz;
        let todays: Vec<EnergyLevel> = history
            .iter()
            .filter(|level| views::local_date(level.timestamp, tz) == today)
            .cloned()
            .collect();

        let suggestions = recommendations(&todays);
        for suggestion in &suggestions {
            info!("Recommendation: {} - {}", suggestion.title, suggestion.description);
        }
        suggestions
    }
}

/// Suggestions driven by the latest entries of `log` (oldest first).
pub fn recommendations(log: &[EnergyLevel]) -> Vec<Recommendation> {
    let mut suggestions = Vec::new();
    let Some(latest) = log.last() else {
        return suggestions;
    };
    let previous = log.len().checked_sub(2).and_then(|i| log.get(i));

    if latest.level == EnergyLevelKind::High {
        suggestions.push(Recommendation::new(
            "Tackle Important Work",
            "Your energy is high. Use it for the task that needs the most focus.",
        ));
    }

    if previous.map_or(false, |p| latest.level < p.level) {
        suggestions.push(Recommendation::new(
            "Take a Break",
            "Your energy levels are dipping. Consider a 15-minute walk or quick meditation session.",
        ));
    }

    if latest.level == EnergyLevelKind::Low {
        suggestions.push(Recommendation::new(
            "Recharge",
            "Your energy is low. Eat something, drink water and keep the next hour light.",
        ));
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Session;
    use crate::gateway::{EnergyLevelRow, MockRemoteGateway};
    use chrono::{DateTime, Duration, TimeZone};

    fn entry(level: EnergyLevelKind, at: DateTime<Utc>) -> EnergyLevel {
        EnergyLevel {
            id: at.timestamp().to_string(),
            level,
            description: None,
            timestamp: at,
            user_id: "user-1".to_string(),
        }
    }

    fn row(id: &str, level: &str, at: DateTime<Utc>) -> EnergyLevelRow {
        EnergyLevelRow {
            id: id.to_string(),
            level: level.to_string(),
            description: None,
            timestamp: at,
            user_id: "user-1".to_string(),
            created_at: None,
        }
    }

    fn tracker(gateway: MockRemoteGateway, tz: Tz) -> EnergyTracker {
        EnergyTracker::new(
            Arc::new(gateway),
            SessionStore::with_session(Session::new("user-1", "token")),
            tz,
        )
    }

    fn titles(log: &[EnergyLevel]) -> Vec<String> {
        recommendations(log).into_iter().map(|r| r.title).collect()
    }

    #[test]
    fn test_recommendations() {
        let t = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        let later = t + Duration::hours(3);

        assert!(titles(&[]).is_empty());
        assert_eq!(titles(&[entry(EnergyLevelKind::High, t)]), vec!["Tackle Important Work"]);
        assert_eq!(
            titles(&[entry(EnergyLevelKind::High, t), entry(EnergyLevelKind::Medium, later)]),
            vec!["Take a Break"]
        );
        assert_eq!(
            titles(&[entry(EnergyLevelKind::Medium, t), entry(EnergyLevelKind::Low, later)]),
            vec!["Take a Break", "Recharge"]
        );
        assert!(titles(&[entry(EnergyLevelKind::Low, t), entry(EnergyLevelKind::Medium, later)]).is_empty());
    }

    #[tokio::test]
    async fn test_record_requires_session() {
        let mut gateway = MockRemoteGateway::new();
        gateway.expect_insert_energy_level().never();

        let tracker = EnergyTracker::new(Arc::new(gateway), SessionStore::new(), chrono_tz::UTC);
        let result = tracker.record(EnergyLevelKind::High, None).await;
        assert!(matches!(result, Err(AppError::AuthenticationRequired)));
    }

    #[tokio::test]
    async fn test_record_returns_stored_entry() {
        let mut gateway = MockRemoteGateway::new();
        gateway
            .expect_insert_energy_level()
            .withf(|_, row| row.level == "Medium" && row.user_id == "user-1")
            .times(1)
            .returning(|_, insert| Ok(row("gw-1", &insert.level, insert.timestamp)));

        let level = tracker(gateway, chrono_tz::UTC)
            .record(EnergyLevelKind::Medium, Some("coffee".to_string()))
            .await
            .unwrap();
        assert_eq!(level.id, "gw-1");
        assert_eq!(level.level, EnergyLevelKind::Medium);
    }

    #[tokio::test]
    async fn test_todays_log_and_current_level() {
        let day = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        let mut gateway = MockRemoteGateway::new();
        gateway.expect_list_energy_levels().returning(move |_| {
            Ok(vec![
                row("3", "Medium", day + Duration::hours(6)),
                row("1", "Medium", day),
                row("x", "Ecstatic", day + Duration::hours(1)),
                row("0", "Low", day - Duration::days(1)),
                row("2", "High", day + Duration::hours(3)),
            ])
        });

        let tracker = tracker(gateway, chrono_tz::UTC);
        let log = tracker.todays_log(day.date_naive()).await.unwrap();
        let ids: Vec<&str> = log.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(titles(&log), vec!["Take a Break"]);

        let current = tracker.current_level().await.unwrap().unwrap();
        assert_eq!(current.id, "3");
    }

    #[tokio::test]
    async fn test_log_summary_survives_gateway_failure() {
        let mut gateway = MockRemoteGateway::new();
        gateway
            .expect_list_energy_levels()
            .times(1)
            .returning(|_| Err(AppError::gateway("connection reset")));

        let suggestions = tracker(gateway, chrono_tz::UTC)
            .log_summary(Utc::now().date_naive())
            .await;
        assert!(suggestions.is_empty());
    }

    #[tokio::test]
    async fn test_log_summary_reads_history_once() {
        let day = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        let mut gateway = MockRemoteGateway::new();
        gateway.expect_list_energy_levels().times(1).returning(move |_| {
            Ok(vec![
                row("1", "High", day),
                row("2", "Low", day + Duration::hours(4)),
                row("0", "High", day - Duration::days(2)),
            ])
        });

        let suggestions = tracker(gateway, chrono_tz::UTC).log_summary(day.date_naive()).await;
        let titles: Vec<String> = suggestions.into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Take a Break", "Recharge"]);
    }

    #[tokio::test]
    async fn test_log_summary_without_entries() {
        let mut gateway = MockRemoteGateway::new();
        gateway.expect_list_energy_levels().times(1).returning(|_| Ok(Vec::new()));

        let suggestions = tracker(gateway, chrono_tz::UTC)
            .log_summary(Utc::now().date_naive())
            .await;
        assert!(suggestions.is_empty());
    }
}
