//! Which date and which calendars are active for display.

use crate::models::Calendar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected_date: DateTime<Utc>,
    /// Kept in selection order, never holding two calendars with the same id.
    pub selected_calendars: Vec<Calendar>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl SelectionState {
    pub fn new(selected_date: DateTime<Utc>) -> Self {
        Self {
            selected_date,
            selected_calendars: Vec::new(),
        }
    }

    pub fn is_selected(&self, calendar_id: &str) -> bool {
        self.selected_calendars.iter().any(|c| c.id == calendar_id)
    }

    pub fn selected_ids(&self) -> Vec<String> {
        self.selected_calendars.iter().map(|c| c.id.clone()).collect()
    }

    /// Adds `calendar` when absent, removes it when present. Keyed by id.
    pub fn toggle(&mut self, calendar: &Calendar) {
        if self.is_selected(&calendar.id) {
            self.selected_calendars.retain(|c| c.id != calendar.id);
        } else {
            self.selected_calendars.push(calendar.clone());
        }
    }

    pub fn select_all(&mut self, calendars: &[Calendar]) {
        self.replace(calendars.to_vec());
    }

    pub fn deselect_all(&mut self) {
        self.selected_calendars.clear();
    }

    pub fn set_date(&mut self, date: DateTime<Utc>) {
        self.selected_date = date;
    }

    /// Replace the selected calendars, dropping repeated ids.
    pub fn replace(&mut self, calendars: Vec<Calendar>) {
        self.selected_calendars.clear();
        for calendar in calendars {
            if !self.is_selected(&calendar.id) {
                self.selected_calendars.push(calendar);
            }
        }
    }
}

/// Initial selection for device calendars: the default calendar, plus the
/// primary one when it is a different calendar. Falls back to the first
/// calendar so a non-empty list never yields an empty selection.
pub fn initial_native_selection(default: Option<&Calendar>, calendars: &[Calendar]) -> Vec<Calendar> {
    let mut selection: Vec<Calendar> = Vec::new();

    if let Some(default) = default {
        selection.push(default.clone());
    }

    if let Some(primary) = calendars.iter().find(|c| c.is_primary) {
        if selection.iter().all(|c| c.id != primary.id) {
            selection.push(primary.clone());
        }
    }

    if selection.is_empty() {
        if let Some(first) = calendars.first() {
            selection.push(first.clone());
        }
    }

    selection
}

/// Initial selection for gateway calendars: just the first one, if any.
pub fn initial_mirrored_selection(calendars: &[Calendar]) -> Vec<Calendar> {
    calendars.first().cloned().into_iter().collect()
}
