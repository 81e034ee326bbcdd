// file: src/models/energy.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnergyLevelKind {
    Low,
    Medium,
    High,
}

impl EnergyLevelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnergyLevelKind::Low => "Low",
            EnergyLevelKind::Medium => "Medium",
            EnergyLevelKind::High => "High",
        }
    }

    pub fn parse(value: &str) -> Result<Self, String> {
        match value.trim().to_lowercase().as_str() {
            "low" => Ok(EnergyLevelKind::Low),
            "medium" => Ok(EnergyLevelKind::Medium),
            "high" => Ok(EnergyLevelKind::High),
            _ => Err(format!("Unknown energy level: {}", value)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyLevel {
    pub id: String,
    pub level: EnergyLevelKind,
    pub description: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
}

impl Recommendation {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
        }
    }
}
