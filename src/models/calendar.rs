// file: src/models/calendar.rs
use serde::{Deserialize, Serialize};

/// Where a calendar comes from. Gateway mirrors are always `System`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarSourceKind {
    System,
    Local,
    CalDav,
    Exchange,
    Subscribed,
    Birthdays,
    Other,
}

impl CalendarSourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarSourceKind::System => "system",
            CalendarSourceKind::Local => "local",
            CalendarSourceKind::CalDav => "caldav",
            CalendarSourceKind::Exchange => "exchange",
            CalendarSourceKind::Subscribed => "subscribed",
            CalendarSourceKind::Birthdays => "birthdays",
            CalendarSourceKind::Other => "other",
        }
    }

    /// Unknown classifications fall back to `Other`.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "system" => CalendarSourceKind::System,
            "local" => CalendarSourceKind::Local,
            "caldav" => CalendarSourceKind::CalDav,
            "exchange" => CalendarSourceKind::Exchange,
            "subscribed" => CalendarSourceKind::Subscribed,
            "birthdays" => CalendarSourceKind::Birthdays,
            _ => CalendarSourceKind::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSource {
    pub name: String,
    pub kind: CalendarSourceKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calendar {
    pub id: String,
    pub title: String,
    pub color: String,
    pub source: CalendarSource,
    pub is_primary: bool,
    pub allows_modifications: bool,
}

impl Calendar {
    pub const UNTITLED: &'static str = "Untitled Calendar";
    pub const DEFAULT_COLOR: &'static str = "#000000";
    pub const DEFAULT_SOURCE: &'static str = "system";

    /// Build the value the engine holds for a calendar row read back from the gateway.
    pub fn mirrored(id: String, title: String, color: String, source_name: String) -> Self {
        Self {
            id,
            title,
            color,
            source: CalendarSource {
                name: source_name,
                kind: CalendarSourceKind::System,
            },
            is_primary: false,
            allows_modifications: true,
        }
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            Self::UNTITLED
        } else {
            &self.title
        }
    }

    pub fn display_color(&self) -> &str {
        if crate::utils::is_hex_color(&self.color) {
            &self.color
        } else {
            Self::DEFAULT_COLOR
        }
    }

    pub fn source_name(&self) -> &str {
        if self.source.name.trim().is_empty() {
            Self::DEFAULT_SOURCE
        } else {
            &self.source.name
        }
    }
}
