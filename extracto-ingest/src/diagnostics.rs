//! Structured trace events emitted while a statement is processed.
//!
//! The engine reports each decision to a [`DiagnosticsSink`] instead of
//! printing, so tests can assert on decisions directly. [`TracingSink`]
//! forwards to `tracing` for the CLI.

use chrono::NaiveDate;
use extracto_core::Direction;
use rust_decimal::Decimal;
use tracing::debug;

use crate::dates::DateSource;

#[derive(Debug, Clone, PartialEq)]
pub enum DiscardReason {
    /// Harvested description did not exceed the minimum length
    DescriptionTooShort { len: usize },
    ZeroAmount,
    UnparseableAmount,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceEvent {
    /// Movements table found between these line indexes (end exclusive)
    SectionDetected { start: usize, end: usize },
    AnchorFound { line: usize, amount: Decimal },
    CandidateEmitted {
        line: usize,
        day: Option<u32>,
        description: String,
    },
    CandidateDiscarded { line: usize, reason: DiscardReason },
    Classified {
        line: usize,
        direction: Direction,
        rule_id: Option<String>,
    },
    DateResolved {
        line: usize,
        date: NaiveDate,
        source: DateSource,
    },
    DuplicateDropped {
        date: NaiveDate,
        description: String,
        amount: Decimal,
    },
}

pub trait DiagnosticsSink {
    fn record(&mut self, event: TraceEvent);
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn record(&mut self, _event: TraceEvent) {}
}

/// Keeps events in memory, in emission order.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<TraceEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn discarded(&self) -> impl Iterator<Item = (usize, &DiscardReason)> {
        self.events.iter().filter_map(|e| match e {
            TraceEvent::CandidateDiscarded { line, reason } => Some((*line, reason)),
            _ => None,
        })
    }

    pub fn count(&self, pred: impl Fn(&TraceEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl DiagnosticsSink for RecordingSink {
    fn record(&mut self, event: TraceEvent) {
        self.events.push(event);
    }
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::SectionDetected { start, end } => {
                debug!(start, end, "movements section")
            }
            TraceEvent::AnchorFound { line, amount } => {
                debug!(line, %amount, "amount anchor")
            }
            TraceEvent::CandidateEmitted {
                line,
                day,
                description,
            } => debug!(line, ?day, %description, "candidate emitted"),
            TraceEvent::CandidateDiscarded { line, reason } => {
                debug!(line, ?reason, "candidate discarded")
            }
            TraceEvent::Classified {
                line,
                direction,
                rule_id,
            } => debug!(line, %direction, rule = rule_id.as_deref().unwrap_or("default"), "classified"),
            TraceEvent::DateResolved { line, date, source } => {
                debug!(line, %date, ?source, "date resolved")
            }
            TraceEvent::DuplicateDropped {
                date,
                description,
                amount,
            } => debug!(%date, %description, %amount, "duplicate dropped"),
        }
    }
}
