//! Calendar dates for reconstructed candidates.
//!
//! Priority: an explicit `dd/mm/yyyy` inside the description, then the
//! harvested day within the statement period, then the period's first day.

use chrono::NaiveDate;
use extracto_core::{Period, clamp_to_month, iso_date};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::types::RawTransactionCandidate;

static EXPLICIT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?P<d>\d{1,2})[/-](?P<m>\d{1,2})[/-](?P<y>\d{4})\b").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    /// Date written out in the description
    Explicit,
    /// Harvested day-of-month within the period
    Day,
    /// No day available; first day of the period
    PeriodStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub source: DateSource,
}

/// First plausible `day/month/year` (or dashed) date in `text`.
///
/// Day 1-31, month 1-12, year after 2020. A day past the end of its month
/// is clamped (`31/02/2024` gives Feb 29).
pub fn find_explicit_date(text: &str) -> Option<NaiveDate> {
    EXPLICIT_DATE.captures_iter(text).find_map(|caps| {
        let day: u32 = caps["d"].parse().ok()?;
        let month: u32 = caps["m"].parse().ok()?;
        let year: i32 = caps["y"].parse().ok()?;
        if !(1..=31).contains(&day) || !(1..=12).contains(&month) || year <= 2020 {
            return None;
        }
        clamp_to_month(year, month, day)
    })
}

pub fn resolve(candidate: &RawTransactionCandidate, period: Period) -> ResolvedDate {
    if let Some(date) = find_explicit_date(&candidate.description) {
        return ResolvedDate {
            date,
            source: DateSource::Explicit,
        };
    }

    match candidate.day {
        Some(day) => ResolvedDate {
            date: period.date_for_day(day),
            source: DateSource::Day,
        },
        None => ResolvedDate {
            date: period.first_day(),
            source: DateSource::PeriodStart,
        },
    }
}

/// Resolve to an ISO-8601 string (`YYYY-MM-DD`). Never fails.
pub fn resolve_date(candidate: &RawTransactionCandidate, period: Period) -> String {
    iso_date(resolve(candidate, period).date)
}
