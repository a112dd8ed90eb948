use extracto_core::{Period, PeriodSource, Transaction};
use extracto_finance::StatementSummary;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One transaction's textual footprint, before classification and dating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransactionCandidate {
    /// Index of the amount-pair line in the segmented text
    pub anchor_line_index: usize,
    /// Standalone day-of-month found next to the description, if any
    pub day: Option<u32>,
    /// Harvested fragments joined by single spaces
    pub description: String,
    /// First amount of the pair; the running balance is discarded
    pub amount: Decimal,
}

/// Tunables for the reconstruction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lines scanned after an anchor before giving up on its description
    pub lookahead: usize,
    /// Descriptions must be longer than this many characters
    pub min_description_len: usize,
    /// Description prefix length used in the duplicate key
    pub dedup_prefix_len: usize,
    /// Restrict the scan to the movements table when its header is found
    pub bound_sections: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            lookahead: 20,
            min_description_len: 10,
            dedup_prefix_len: 30,
            bound_sections: true,
        }
    }
}

/// Everything one statement yields: transactions plus metadata for the
/// presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementReport {
    pub source_identifier: String,
    pub period: Period,
    pub period_source: PeriodSource,
    pub transaction_count: usize,
    pub transactions: Vec<Transaction>,
    pub summary: StatementSummary,
}
