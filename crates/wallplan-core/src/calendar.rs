//! Calendar helpers for the planner layout
//!
//! Labels follow the German locale the generated planner ships with
//! ("Januar 2024", weekday abbreviations "Mo".."So"). Week numbering is the
//! first-four-day-week rule with Monday as the first day of the week, with
//! week 53 wrapped back to 1 so the label never jumps at a year boundary.

use chrono::{Datelike, Months, NaiveDate, Weekday};

/// German month names, January first
pub const MONTH_NAMES: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// German weekday abbreviations, Monday first
pub const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"];

/// Month header label, e.g. "Januar 2024"
pub fn month_label(date: NaiveDate) -> String {
    format!("{} {}", MONTH_NAMES[date.month0() as usize], date.year())
}

/// Weekday abbreviation for a date, e.g. "Mo"
pub fn weekday_abbreviation(date: NaiveDate) -> &'static str {
    WEEKDAY_ABBREVIATIONS[date.weekday().num_days_from_monday() as usize]
}

/// Week number for the planner's week column.
///
/// ISO week (Monday start, first four-day week), except that week 53 is
/// reported as 1.
pub fn week_number(date: NaiveDate) -> u32 {
    let week = date.iso_week().week();
    if week == 53 {
        1
    } else {
        week
    }
}

/// First day of the month `date` falls in
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).expect("day 1 exists in every month")
}

/// Number of days in the month `date` falls in
pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    let next = first + Months::new(1);
    next.pred_opt().expect("previous day exists").day()
}

/// Is the date a Saturday?
pub fn is_saturday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sat
}

/// Is the date a Sunday?
pub fn is_sunday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sun
}

/// Iterator over the first days of consecutive months
#[derive(Debug, Clone)]
pub struct MonthRange {
    next: NaiveDate,
    remaining: u32,
}

impl MonthRange {
    /// Iterate `count` months starting at the month `from` falls in
    pub fn new(from: NaiveDate, count: u32) -> Self {
        Self {
            next: first_of_month(from),
            remaining: count,
        }
    }

    /// Iterate every month from `from`'s month through `to`'s month inclusive
    pub fn until(from: NaiveDate, to: NaiveDate) -> Self {
        let from = first_of_month(from);
        let to = first_of_month(to);
        let count = if to < from {
            0
        } else {
            (to.year() - from.year()) as u32 * 12 + to.month() - from.month() + 1
        };
        Self {
            next: from,
            remaining: count,
        }
    }
}

impl Iterator for MonthRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.next = current + Months::new(1);
        self.remaining -= 1;
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for MonthRange {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label(date(2024, 1, 1)), "Januar 2024");
        assert_eq!(month_label(date(2025, 12, 31)), "Dezember 2025");
        assert_eq!(month_label(date(2024, 3, 15)), "März 2024");
    }

    #[test]
    fn test_weekday_abbreviation() {
        // 2024-01-01 is a Monday
        assert_eq!(weekday_abbreviation(date(2024, 1, 1)), "Mo");
        assert_eq!(weekday_abbreviation(date(2024, 1, 6)), "Sa");
        assert_eq!(weekday_abbreviation(date(2024, 1, 7)), "So");
    }

    #[test]
    fn test_week_number_wraps_53_to_1() {
        // 2024-01-01 starts ISO week 1
        assert_eq!(week_number(date(2024, 1, 1)), 1);
        assert_eq!(week_number(date(2024, 1, 8)), 2);
        // 2016-01-01 falls in ISO week 53 of 2015; the planner labels it 1
        assert_eq!(week_number(date(2016, 1, 1)), 1);
        assert_eq!(week_number(date(2015, 12, 28)), 1);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(date(2024, 1, 15)), 31);
        assert_eq!(days_in_month(date(2024, 2, 1)), 29);
        assert_eq!(days_in_month(date(2023, 2, 1)), 28);
        assert_eq!(days_in_month(date(2024, 4, 30)), 30);
    }

    #[test]
    fn test_month_range_by_count() {
        let months: Vec<_> = MonthRange::new(date(2024, 11, 15), 3).collect();
        assert_eq!(
            months,
            vec![date(2024, 11, 1), date(2024, 12, 1), date(2025, 1, 1)]
        );
    }

    #[test]
    fn test_month_range_until() {
        let months: Vec<_> = MonthRange::until(date(2024, 1, 10), date(2024, 3, 5)).collect();
        assert_eq!(
            months,
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]
        );

        assert_eq!(MonthRange::until(date(2024, 3, 1), date(2024, 1, 1)).count(), 0);
    }
}
