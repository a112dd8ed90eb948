//! Statement period extraction.
//!
//! Banregio headers declare the period once, e.g.
//! `Periodo del 01 al 31 de MARZO 2024`.

use extracto_core::{Period, PeriodSource, month_from_spanish};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PERIOD_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i)\bdel\s+\d{1,2}\s+al\s+\d{1,2}\s+de\s+",
        r"(?P<month>[a-záéíóúñ]+)\s+(?:del?\s+)?(?P<year>\d{4})\b"
    ))
    .expect("valid regex")
});

static MONTH_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bde\s+(?P<month>[a-záéíóúñ]+)\s+(?:del?\s+)?(?P<year>\d{4})\b")
        .expect("valid regex")
});

/// A period plus whether the text actually declared it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodLookup {
    pub period: Period,
    pub source: PeriodSource,
}

impl PeriodLookup {
    pub fn is_fallback(&self) -> bool {
        self.source == PeriodSource::Fallback
    }
}

fn period_from(caps: &Captures) -> Option<Period> {
    let month = month_from_spanish(&caps["month"])?;
    let year: i32 = caps["year"].parse().ok()?;
    Period::new(year, month)
}

/// Find the declared period, if any.
///
/// Tries the full `del D1 al D2 de MES AAAA` phrase first, then any
/// `de MES AAAA` whose month word is a real month name.
pub fn find_period(text: &str) -> Option<Period> {
    PERIOD_RANGE
        .captures_iter(text)
        .find_map(|c| period_from(&c))
        .or_else(|| MONTH_YEAR.captures_iter(text).find_map(|c| period_from(&c)))
}

pub fn lookup_period(text: &str) -> PeriodLookup {
    match find_period(text) {
        Some(period) => PeriodLookup {
            period,
            source: PeriodSource::Declared,
        },
        None => PeriodLookup {
            period: Period::FALLBACK,
            source: PeriodSource::Fallback,
        },
    }
}

/// Never fails: falls back to [`Period::FALLBACK`] (March 2024) when the
/// text declares nothing. Use [`lookup_period`] to tell the two apart.
pub fn extract_period(text: &str) -> Period {
    lookup_period(text).period
}
