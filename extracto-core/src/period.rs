//! Statement period: the month/year a statement declares once in its header.

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::time::{clamp_to_month, days_in_month};

/// Spanish month names as they appear in statement headers.
const MONTHS: [(&str, u32); 13] = [
    ("enero", 1),
    ("febrero", 2),
    ("marzo", 3),
    ("abril", 4),
    ("mayo", 5),
    ("junio", 6),
    ("julio", 7),
    ("agosto", 8),
    ("septiembre", 9),
    ("setiembre", 9),
    ("octubre", 10),
    ("noviembre", 11),
    ("diciembre", 12),
];

/// Look up a Spanish month name (any case).
pub fn month_from_spanish(name: &str) -> Option<u32> {
    let name = name.trim().to_lowercase();
    MONTHS
        .iter()
        .find(|(m, _)| *m == name)
        .map(|(_, n)| *n)
}

/// Accounting month of a statement.
///
/// Always holds a valid month (1-12) and a four-digit year, so every
/// date derived from it is a real calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod")]
pub struct Period {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawPeriod {
    year: i32,
    month: u32,
}

impl TryFrom<RawPeriod> for Period {
    type Error = String;

    fn try_from(raw: RawPeriod) -> std::result::Result<Self, Self::Error> {
        Period::new(raw.year, raw.month)
            .ok_or_else(|| format!("invalid period {}-{}", raw.year, raw.month))
    }
}

impl Period {
    /// Used when a statement declares no period. March 2024 is what the
    /// statements this engine was built against covered.
    pub const FALLBACK: Period = Period { year: 2024, month: 3 };

    pub fn new(year: i32, month: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return None;
        }
        Some(Period { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn last_day(&self) -> u32 {
        days_in_month(self.year, self.month).unwrap_or(28)
    }

    pub fn first_day(&self) -> NaiveDate {
        self.date_for_day(1)
    }

    /// Date for a day-of-month inside this period, clamped to the month's length.
    pub fn date_for_day(&self, day: u32) -> NaiveDate {
        clamp_to_month(self.year, self.month, day).unwrap_or_default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first_day() && date <= self.date_for_day(self.last_day())
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parses `YYYY-MM` (e.g. `2024-03`).
impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (y, m) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| anyhow!("expected YYYY-MM, got '{s}'"))?;
        let year: i32 = y.parse().map_err(|e| anyhow!("invalid year '{y}': {e}"))?;
        let month: u32 = m.parse().map_err(|e| anyhow!("invalid month '{m}': {e}"))?;
        match Period::new(year, month) {
            Some(p) => Ok(p),
            None => bail!("period out of range: {s}"),
        }
    }
}

/// Where a period came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodSource {
    /// Found in the statement text.
    Declared,
    /// Nothing found; [`Period::FALLBACK`] was used.
    Fallback,
    /// Supplied by the caller.
    Override,
}
