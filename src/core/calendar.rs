use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::Serialize;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One day of the month grid. Cells before day 1 are `None` in the grid,
/// which serializes to `null` for the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCell<T> {
    pub day: u32,
    pub events: Vec<T>,
}

/// Half-open `[month_start, next_month_start)` bounds of `now`'s UTC month.
pub fn month_bounds(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let (year, month) = (now.year(), now.month());
    let start = first_instant_of(year, month);
    let end = if month == 12 {
        first_instant_of(year + 1, 1)
    } else {
        first_instant_of(year, month + 1)
    };
    (start, end)
}

fn first_instant_of(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("first day of a month is a valid UTC instant")
}

fn first_of(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).expect("day 1 exists in every month")
}

/// Weekday index of day 1, Monday = 0. This many leading `None` cells pad
/// the grid so weekday columns line up.
pub fn leading_pad(year: i32, month: u32) -> u32 {
    first_of(year, month).weekday().num_days_from_monday()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next = if month == 12 {
        first_of(year + 1, 1)
    } else {
        first_of(year, month + 1)
    };
    (next - first_of(year, month)).num_days() as u32
}

/// Builds the padded grid: leading `None` cells for the weekday offset of
/// day 1, then one cell per day carrying its events. `items` pairs each
/// event with its day-of-month; out-of-range days are ignored.
pub fn month_grid<T>(year: i32, month: u32, items: Vec<(u32, T)>) -> Vec<Option<DayCell<T>>> {
    let total_days = days_in_month(year, month);

    let mut per_day: Vec<Vec<T>> = (0..total_days).map(|_| Vec::new()).collect();
    for (day, item) in items {
        if (1..=total_days).contains(&day) {
            per_day[(day - 1) as usize].push(item);
        }
    }

    let mut cells = Vec::with_capacity((leading_pad(year, month) + total_days) as usize);
    for _ in 0..leading_pad(year, month) {
        cells.push(None);
    }
    for (offset, events) in per_day.into_iter().enumerate() {
        cells.push(Some(DayCell {
            day: offset as u32 + 1,
            events,
        }));
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds_are_half_open_month_span() {
        let now: DateTime<Utc> = "2025-06-15T12:30:00Z".parse().unwrap();
        let (start, end) = month_bounds(now);
        assert_eq!(start, "2025-06-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(end, "2025-07-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_month_bounds_roll_over_december() {
        let now: DateTime<Utc> = "2025-12-03T00:00:00Z".parse().unwrap();
        let (start, end) = month_bounds(now);
        assert_eq!(start.year(), 2025);
        assert_eq!(end.year(), 2026);
        assert_eq!(end.month(), 1);
    }

    #[test]
    fn test_wednesday_month_start_pads_two_cells() {
        // October 2025 starts on a Wednesday (weekday index 2).
        assert_eq!(leading_pad(2025, 10), 2);
        let grid: Vec<Option<DayCell<&str>>> = month_grid(2025, 10, Vec::new());
        assert!(grid[0].is_none());
        assert!(grid[1].is_none());
        assert_eq!(grid[2].as_ref().unwrap().day, 1);
        assert_eq!(grid.len(), 2 + 31);
    }

    #[test]
    fn test_monday_month_start_has_no_padding() {
        // September 2025 starts on a Monday.
        assert_eq!(leading_pad(2025, 9), 0);
        assert_eq!(days_in_month(2025, 9), 30);
    }

    #[test]
    fn test_grid_buckets_events_by_day() {
        let grid = month_grid(2025, 6, vec![(1, "standup"), (15, "launch"), (15, "party")]);
        // June 2025 starts on a Sunday: six pad cells.
        assert_eq!(leading_pad(2025, 6), 6);
        let day1 = grid[6].as_ref().unwrap();
        assert_eq!(day1.events, vec!["standup"]);
        let day15 = grid[6 + 14].as_ref().unwrap();
        assert_eq!(day15.events, vec!["launch", "party"]);
        let day2 = grid[7].as_ref().unwrap();
        assert!(day2.events.is_empty());
    }

    #[test]
    fn test_february_leap_year_length() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
    }
}
