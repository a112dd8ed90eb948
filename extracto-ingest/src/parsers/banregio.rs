//! Banregio account statement reconstructor (flattened text)
//!
//! The statement's movements table has five columns:
//!   DIA   CONCEPTO                              CARGOS    ABONOS    SALDO
//!
//! Once the PDF is flattened to text the columns lose their alignment, and a
//! single movement typically comes out as:
//!   2,500.00    15,430.00          <- amount + running balance
//!   18                             <- day (may come before or after the concept, or be missing)
//!   TRA SPEI-GKNF348               <- concept, one or more lines
//!   NATALIA TIJERINA
//!
//! The amount pair is the most reliable fingerprint, so each movement is
//! anchored on it and the day and description are harvested forward from
//! there within a bounded window.

use extracto_finance::fold;
use regex::Regex;
use rust_decimal::Decimal;
use std::ops::Range;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::diagnostics::{DiagnosticsSink, DiscardReason, NullSink, TraceEvent};
use crate::types::{EngineConfig, RawTransactionCandidate};

static AMOUNT_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<amount>(?:\d{1,3}(?:,\d{3}){1,4}|\d{1,15})\.\d{2})\s+",
        r"(?P<balance>(?:\d{1,3}(?:,\d{3}){1,4}|\d{1,15})\.\d{2})$"
    ))
    .expect("valid regex")
});

static DAY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{1,2}$").expect("valid regex"));

/// Folded line prefixes that close the movements table.
static SECTION_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:total(?:es)?\b|saldo minimo|grafico)").expect("valid regex")
});

/// Column header words, folded.
const HEADER_WORDS: [&str; 5] = ["dia", "concepto", "cargos", "abonos", "saldo"];

/// Split text into trimmed lines. Blank lines are kept so indexes stay stable.
pub fn segment_lines(text: &str) -> Vec<String> {
    text.lines().map(|l| l.trim().to_string()).collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Transaction amount of an amount-pair line (the balance is dropped).
pub fn parse_amount_pair(line: &str) -> Option<&str> {
    AMOUNT_PAIR
        .captures(line.trim())
        .and_then(|c| c.name("amount"))
        .map(|m| m.as_str())
}

pub fn is_anchor(line: &str) -> bool {
    AMOUNT_PAIR.is_match(line.trim())
}

/// A line that is nothing but a day-of-month (1-31).
pub fn day_token(line: &str) -> Option<u32> {
    let line = line.trim();
    if !DAY.is_match(line) {
        return None;
    }
    line.parse().ok().filter(|d| (1..=31).contains(d))
}

/// A line made only of column header words (`DIA`, `CONCEPTO`, ...).
pub fn is_header(line: &str) -> bool {
    let folded = fold(line);
    let mut words = folded.split_whitespace().peekable();
    words.peek().is_some() && words.all(|w| HEADER_WORDS.contains(&w))
}

fn is_section_header(line: &str) -> bool {
    let folded = fold(line);
    folded.contains("concepto") && (folded.contains("cargos") || folded.contains("abonos"))
}

fn is_section_end(line: &str) -> bool {
    SECTION_END.is_match(&fold(line))
}

/// Line ranges holding the movements table.
///
/// A section opens after each table header (one per page) and closes at the
/// totals/summary block or at the next header. Returns `None` when the text
/// has no recognisable header.
pub fn movement_sections(lines: &[String]) -> Option<Vec<Range<usize>>> {
    let mut sections = Vec::new();
    let mut open: Option<usize> = None;

    for (i, line) in lines.iter().enumerate() {
        if is_section_header(line) {
            if let Some(start) = open.take() {
                sections.push(start..i);
            }
            open = Some(i + 1);
        } else if open.is_some() && is_section_end(line) {
            if let Some(start) = open.take() {
                sections.push(start..i);
            }
        }
    }

    if let Some(start) = open {
        sections.push(start..lines.len());
    }

    if sections.is_empty() { None } else { Some(sections) }
}

struct Harvest {
    day: Option<u32>,
    fragments: Vec<String>,
    /// First line not consumed by this harvest
    next: usize,
}

/// Anchor-then-harvest scanner.
pub struct Reconstructor<'a> {
    config: &'a EngineConfig,
}

impl<'a> Reconstructor<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Scan the movements sections (or everything when no header is found,
    /// or when section bounding is off).
    pub fn reconstruct_sections(
        &self,
        lines: &[String],
        sink: &mut dyn DiagnosticsSink,
    ) -> Vec<RawTransactionCandidate> {
        let sections = if self.config.bound_sections {
            movement_sections(lines)
        } else {
            None
        };

        let Some(sections) = sections else {
            return self.reconstruct(lines, sink);
        };

        let mut out = Vec::new();
        for range in sections {
            sink.record(TraceEvent::SectionDetected {
                start: range.start,
                end: range.end,
            });
            out.extend(self.reconstruct_range(lines, range, sink));
        }
        out
    }

    /// Scan every line.
    pub fn reconstruct(
        &self,
        lines: &[String],
        sink: &mut dyn DiagnosticsSink,
    ) -> Vec<RawTransactionCandidate> {
        self.reconstruct_range(lines, 0..lines.len(), sink)
    }

    fn reconstruct_range(
        &self,
        lines: &[String],
        range: Range<usize>,
        sink: &mut dyn DiagnosticsSink,
    ) -> Vec<RawTransactionCandidate> {
        let end = range.end.min(lines.len());
        let mut out = Vec::new();
        let mut i = range.start;
        // Lines before this index were consumed by an earlier harvest.
        let mut free_from = range.start;

        while i < end {
            let Some(raw_amount) = parse_amount_pair(&lines[i]) else {
                i += 1;
                continue;
            };

            let amount = match Decimal::from_str(&raw_amount.replace(',', "")) {
                Ok(a) => a,
                Err(_) => {
                    sink.record(TraceEvent::CandidateDiscarded {
                        line: i,
                        reason: DiscardReason::UnparseableAmount,
                    });
                    i += 1;
                    continue;
                }
            };
            sink.record(TraceEvent::AnchorFound { line: i, amount });

            let harvest = self.harvest(lines, i, end);
            let description = harvest.fragments.join(" ");
            let len = description.chars().count();

            if len <= self.config.min_description_len {
                sink.record(TraceEvent::CandidateDiscarded {
                    line: i,
                    reason: DiscardReason::DescriptionTooShort { len },
                });
                i += 1;
                continue;
            }
            if amount.is_zero() {
                sink.record(TraceEvent::CandidateDiscarded {
                    line: i,
                    reason: DiscardReason::ZeroAmount,
                });
                i += 1;
                continue;
            }

            // Day printed just above the amount, not claimed by the previous movement.
            let day = harvest.day.or_else(|| {
                i.checked_sub(1)
                    .filter(|prev| *prev >= free_from)
                    .and_then(|prev| day_token(&lines[prev]))
            });

            sink.record(TraceEvent::CandidateEmitted {
                line: i,
                day,
                description: description.clone(),
            });
            out.push(RawTransactionCandidate {
                anchor_line_index: i,
                day,
                description,
                amount,
            });

            i = harvest.next;
            free_from = harvest.next;
        }

        out
    }

    /// Collect day and description lines after the anchor at `anchor`.
    ///
    /// Stops at the next anchor (not consumed), at the lookahead limit, or
    /// at a day token that follows description text (consumed). A day seen
    /// before any description is kept and the scan continues; a second day
    /// token stops the scan unconsumed since it belongs to the next movement.
    fn harvest(&self, lines: &[String], anchor: usize, end: usize) -> Harvest {
        let limit = end.min(anchor + 1 + self.config.lookahead);
        let mut day = None;
        let mut fragments: Vec<String> = Vec::new();
        let mut j = anchor + 1;

        while j < limit {
            let line = lines[j].as_str();
            if line.is_empty() || is_header(line) {
                j += 1;
                continue;
            }
            if is_anchor(line) {
                break;
            }
            if let Some(d) = day_token(line) {
                if day.is_some() {
                    break;
                }
                day = Some(d);
                j += 1;
                if fragments.is_empty() {
                    continue;
                }
                break;
            }
            fragments.push(collapse_whitespace(line));
            j += 1;
        }

        Harvest {
            day,
            fragments,
            next: j,
        }
    }
}

/// Reconstruct candidates from already-segmented lines with default settings.
pub fn reconstruct(lines: &[String]) -> Vec<RawTransactionCandidate> {
    let config = EngineConfig::default();
    Reconstructor::new(&config).reconstruct(lines, &mut NullSink)
}
