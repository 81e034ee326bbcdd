//! Views derived from the engine snapshot on demand. Nothing here is stored.
//!
//! Days are calendar days in the configured time zone, so an event at
//! 23:30 UTC can belong to the next day in Berlin.

use crate::models::{Calendar, CalendarEvent};
use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use chrono_tz::Tz;

/// At most this many colour dots are shown under a day.
pub const MAX_DAY_MARKERS: usize = 3;

pub type Week = [NaiveDate; 7];

pub fn local_date(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).and_then(|d| d.pred_opt())
}

/// Sunday-first weeks covering the whole month of `date`: from the Sunday
/// on or before the 1st through the Saturday on or after the last day.
///
/// At the ends of the representable date range only the weeks whose seven
/// days all exist are returned.
pub fn month_grid(date: NaiveDate) -> Vec<Week> {
    let month_start = date.with_day(1).unwrap_or(date);
    let month_end = last_day_of_month(date.year(), date.month()).unwrap_or(NaiveDate::MAX);

    let lead = u64::from(month_start.weekday().num_days_from_sunday());
    let mut cursor = month_start
        .checked_sub_days(Days::new(lead))
        .or_else(|| month_start.checked_add_days(Days::new(7 - lead)));

    let mut weeks = Vec::new();
    while let Some(week_start) = cursor {
        if week_start > month_end {
            break;
        }
        let Some(week) = week_from(week_start) else {
            break;
        };
        weeks.push(week);
        cursor = week_start.checked_add_days(Days::new(7));
    }
    weeks
}

fn week_from(start: NaiveDate) -> Option<Week> {
    let mut week = [start; 7];
    for (offset, day) in week.iter_mut().enumerate().skip(1) {
        *day = start.checked_add_days(Days::new(offset as u64))?;
    }
    Some(week)
}

/// Events whose start falls on `day`, in snapshot order.
pub fn events_on_day(day: NaiveDate, events: &[CalendarEvent], tz: Tz) -> Vec<&CalendarEvent> {
    events
        .iter()
        .filter(|event| local_date(event.start_date, tz) == day)
        .collect()
}

/// Distinct colours of the calendars owning events on `day`, first-seen
/// order, capped at [`MAX_DAY_MARKERS`]. Events of calendars missing from
/// `calendars` contribute nothing.
pub fn day_color_markers(day: NaiveDate, events: &[CalendarEvent], calendars: &[Calendar], tz: Tz) -> Vec<String> {
    let mut colors: Vec<String> = Vec::new();

    for event in events_on_day(day, events, tz) {
        let Some(calendar) = calendars.iter().find(|c| c.id == event.calendar_id) else {
            continue;
        };
        if !colors.iter().any(|c| c == &calendar.color) {
            colors.push(calendar.color.clone());
            if colors.len() == MAX_DAY_MARKERS {
                break;
            }
        }
    }

    colors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalendarSource, CalendarSourceKind};
    use chrono::{Duration, TimeZone, Weekday};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn calendar(id: &str, color: &str) -> Calendar {
        Calendar {
            id: id.to_string(),
            title: id.to_string(),
            color: color.to_string(),
            source: CalendarSource {
                name: "Local".to_string(),
                kind: CalendarSourceKind::Local,
            },
            is_primary: false,
            allows_modifications: true,
        }
    }

    fn event_at(id: &str, calendar_id: &str, start: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id: id.to_string(),
            title: id.to_string(),
            notes: None,
            start_date: start,
            end_date: start + Duration::hours(1),
            location: None,
            calendar_id: calendar_id.to_string(),
        }
    }

    #[test]
    fn test_month_grid_march_2024() {
        let grid = month_grid(day(2024, 3, 15));

        assert_eq!(grid[0][0], day(2024, 2, 25));
        assert_eq!(grid[0][0].weekday(), Weekday::Sun);
        let last = grid[grid.len() - 1][6];
        assert_eq!(last, day(2024, 4, 6));
        assert_eq!(last.weekday(), Weekday::Sat);
        assert_eq!(grid.len(), 6);
    }

    #[test]
    fn test_month_grid_four_weeks() {
        // February 2015 starts on a Sunday and ends on a Saturday
        let grid = month_grid(day(2015, 2, 10));
        assert_eq!(grid.len(), 4);
        assert_eq!(grid[0][0], day(2015, 2, 1));
        assert_eq!(grid[3][6], day(2015, 2, 28));
    }

    #[test]
    fn test_month_grid_december() {
        let grid = month_grid(day(2023, 12, 31));
        assert_eq!(grid[0][0], day(2023, 11, 26));
        assert_eq!(grid[grid.len() - 1][6], day(2024, 1, 6));
    }

    #[test]
    fn test_month_grid_days_are_consecutive() {
        let grid = month_grid(day(2024, 7, 4));
        let days: Vec<NaiveDate> = grid.iter().flatten().copied().collect();
        for pair in days.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::days(1));
        }
        assert!(days.contains(&day(2024, 7, 1)));
        assert!(days.contains(&day(2024, 7, 31)));
    }

    fn assert_sunday_weeks(grid: &[Week]) {
        for week in grid {
            assert_eq!(week[0].weekday(), Weekday::Sun);
            for pair in week.windows(2) {
                assert_eq!(pair[1] - pair[0], Duration::days(1));
            }
        }
    }

    #[test]
    fn test_month_grid_at_latest_date() {
        let last = local_date(DateTime::<Utc>::MAX_UTC, chrono_tz::UTC);
        let grid = month_grid(last);

        assert!(!grid.is_empty());
        assert_sunday_weeks(&grid);
        assert!(grid.iter().flatten().all(|d| d.month() == 12 || d.month() == 11));
        assert_eq!(month_grid(NaiveDate::MAX), grid);
    }

    #[test]
    fn test_month_grid_at_earliest_date() {
        let grid = month_grid(NaiveDate::MIN);

        assert!(!grid.is_empty());
        assert_sunday_weeks(&grid);
        assert!(grid[0][0] >= NaiveDate::MIN);
        assert!(grid.iter().flatten().any(|d| d.month() == 1 && d.year() == NaiveDate::MIN.year()));
    }

    #[test]
    fn test_day_color_markers_dedup_in_order() {
        let calendars = vec![calendar("c1", "#ff0000"), calendar("c2", "#00ff00")];
        let d = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        let events = vec![
            event_at("e1", "c1", d),
            event_at("e2", "c2", d + Duration::hours(1)),
            event_at("e3", "c1", d + Duration::hours(2)),
        ];

        let markers = day_color_markers(day(2024, 3, 15), &events, &calendars, chrono_tz::UTC);
        assert_eq!(markers, vec!["#ff0000", "#00ff00"]);
    }

    #[test]
    fn test_day_color_markers_capped() {
        let calendars: Vec<Calendar> = (0..5)
            .map(|i| calendar(&format!("c{}", i), &format!("#00000{}", i)))
            .collect();
        let d = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        let events: Vec<CalendarEvent> = (0..5)
            .map(|i| event_at(&format!("e{}", i), &format!("c{}", i), d))
            .collect();

        let markers = day_color_markers(day(2024, 3, 15), &events, &calendars, chrono_tz::UTC);
        assert_eq!(markers.len(), MAX_DAY_MARKERS);
        assert_eq!(markers[0], "#000000");
    }

    #[test]
    fn test_day_color_markers_skip_unknown_calendars() {
        let calendars = vec![calendar("c1", "#ff0000")];
        let d = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        let events = vec![event_at("e1", "ghost", d), event_at("e2", "c1", d)];

        let markers = day_color_markers(day(2024, 3, 15), &events, &calendars, chrono_tz::UTC);
        assert_eq!(markers, vec!["#ff0000"]);
    }

    #[test]
    fn test_events_on_day_respects_time_zone() {
        let late = Utc.with_ymd_and_hms(2024, 3, 15, 23, 30, 0).unwrap();
        let events = vec![event_at("late", "c1", late)];

        assert_eq!(events_on_day(day(2024, 3, 15), &events, chrono_tz::UTC).len(), 1);
        assert!(events_on_day(day(2024, 3, 15), &events, chrono_tz::Europe::Berlin).is_empty());
        assert_eq!(events_on_day(day(2024, 3, 16), &events, chrono_tz::Europe::Berlin).len(), 1);
    }

    #[test]
    fn test_events_on_day_keeps_snapshot_order() {
        let d = Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap();
        let events = vec![
            event_at("a", "c1", d),
            event_at("other-day", "c1", d + Duration::days(1)),
            event_at("b", "c1", d + Duration::hours(3)),
        ];
        let ids: Vec<&str> = events_on_day(day(2024, 3, 15), &events, chrono_tz::UTC)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
