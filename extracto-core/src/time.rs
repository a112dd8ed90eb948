//! Calendar helpers: month lengths and day clamping.

use chrono::{Datelike, NaiveDate};

/// Number of days in `month` of `year`, or `None` if the month is invalid.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// Build a date in `year`/`month`, pulling `day` into `1..=last day of month`.
///
/// Day 31 in a 30-day month becomes 30, day 0 becomes 1.
pub fn clamp_to_month(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let last = days_in_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, day.clamp(1, last))
}

/// Render a date the way every emitted record carries it (`YYYY-MM-DD`).
pub fn iso_date(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(2024, 4), Some(30));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_clamp_to_month() {
        let d = clamp_to_month(2024, 4, 31).unwrap();
        assert_eq!(iso_date(d), "2024-04-30");

        let d = clamp_to_month(2023, 2, 30).unwrap();
        assert_eq!(iso_date(d), "2023-02-28");

        let d = clamp_to_month(2024, 3, 0).unwrap();
        assert_eq!(iso_date(d), "2024-03-01");
    }
}
