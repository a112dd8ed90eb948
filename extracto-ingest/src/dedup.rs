//! Duplicate collapsing and chronological ordering.
//!
//! Overlapping harvest windows can yield the same movement twice. Two
//! transactions are the same when they share the date, the first
//! `prefix_len` characters of the description (case-insensitive) and the
//! absolute amount. The first occurrence is kept.

use chrono::NaiveDate;
use extracto_core::Transaction;
use rust_decimal::Decimal;
use std::collections::HashSet;

use crate::diagnostics::{DiagnosticsSink, NullSink, TraceEvent};

pub const DEFAULT_PREFIX_LEN: usize = 30;

pub type DedupKey = (NaiveDate, String, Decimal);

pub fn dedup_key(txn: &Transaction, prefix_len: usize) -> DedupKey {
    let prefix: String = txn
        .description
        .to_lowercase()
        .chars()
        .take(prefix_len)
        .collect();
    // normalize() so 2500.00 and 2500.0 hash the same
    (txn.transaction_date, prefix, txn.abs_amount().normalize())
}

/// Drop duplicates, then stable-sort ascending by date.
pub fn finalize_with(
    txns: Vec<Transaction>,
    prefix_len: usize,
    sink: &mut dyn DiagnosticsSink,
) -> Vec<Transaction> {
    let mut seen: HashSet<DedupKey> = HashSet::new();
    let mut out = Vec::with_capacity(txns.len());

    for txn in txns {
        if seen.insert(dedup_key(&txn, prefix_len)) {
            out.push(txn);
        } else {
            sink.record(TraceEvent::DuplicateDropped {
                date: txn.transaction_date,
                description: txn.description,
                amount: txn.amount,
            });
        }
    }

    out.sort_by_key(|t| t.transaction_date);
    out
}

pub fn finalize(txns: Vec<Transaction>) -> Vec<Transaction> {
    finalize_with(txns, DEFAULT_PREFIX_LEN, &mut NullSink)
}
