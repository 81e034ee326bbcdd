// file: src/models/mod.rs

// Declare modules
pub mod calendar;
pub mod energy;
pub mod event;
pub mod settings;
pub mod sync;

// Re-export all public types so imports like `use crate::models::Calendar` work.
pub use calendar::{Calendar, CalendarSource, CalendarSourceKind};
pub use energy::{EnergyLevel, EnergyLevelKind, Recommendation};
pub use event::{CalendarEvent, EventPatch, NewEvent};
pub use settings::{Setting, Settings};
pub use sync::{SyncResult, SyncStatus};
