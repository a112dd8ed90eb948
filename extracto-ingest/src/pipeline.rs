//! Top-level statement pipeline: segment, reconstruct, classify, date,
//! categorize, dedupe and sort.

use anyhow::{Context, Result};
use extracto_core::{Period, PeriodSource, Transaction};
use extracto_finance::{CategoryRules, DirectionRules, clean_description, summarize};
use tracing::{info, warn};

use crate::dates;
use crate::dedup::finalize_with;
use crate::diagnostics::{DiagnosticsSink, TraceEvent, TracingSink};
use crate::extract::TextExtractor;
use crate::parsers::banregio::{Reconstructor, segment_lines};
use crate::period::lookup_period;
use crate::types::{EngineConfig, RawTransactionCandidate, StatementReport};

/// The reconstruction engine. Holds no per-document state; one instance can
/// process any number of statements.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
    direction_rules: DirectionRules,
    category_rules: CategoryRules,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn with_direction_rules(mut self, rules: DirectionRules) -> Self {
        self.direction_rules = rules;
        self
    }

    pub fn with_category_rules(mut self, rules: CategoryRules) -> Self {
        self.category_rules = rules;
        self
    }

    pub fn direction_rules(&self) -> &DirectionRules {
        &self.direction_rules
    }

    pub fn category_rules(&self) -> &CategoryRules {
        &self.category_rules
    }

    /// Text in, sorted and deduplicated transactions out. Never fails;
    /// unrecognisable text yields an empty list.
    pub fn run(
        &self,
        text: &str,
        period: Period,
        sink: &mut dyn DiagnosticsSink,
    ) -> Vec<Transaction> {
        let lines = segment_lines(text);
        let candidates = Reconstructor::new(&self.config).reconstruct_sections(&lines, sink);

        let txns: Vec<Transaction> = candidates
            .iter()
            .map(|c| self.to_transaction(c, period, sink))
            .collect();

        finalize_with(txns, self.config.dedup_prefix_len, sink)
    }

    fn to_transaction(
        &self,
        candidate: &RawTransactionCandidate,
        period: Period,
        sink: &mut dyn DiagnosticsSink,
    ) -> Transaction {
        let line = candidate.anchor_line_index;

        let classification = self.direction_rules.classify_detailed(&candidate.description);
        sink.record(TraceEvent::Classified {
            line,
            direction: classification.direction,
            rule_id: classification.rule_id,
        });

        let resolved = dates::resolve(candidate, period);
        sink.record(TraceEvent::DateResolved {
            line,
            date: resolved.date,
            source: resolved.source,
        });

        Transaction::new(
            resolved.date,
            candidate.description.as_str(),
            clean_description(&candidate.description),
            candidate.amount,
            classification.direction,
            self.category_rules.categorize(&candidate.description),
        )
    }

    /// Full statement processing: period detection (unless `period` is
    /// given), reconstruction, and report metadata.
    pub fn process(
        &self,
        source_identifier: &str,
        text: &str,
        period: Option<Period>,
        sink: &mut dyn DiagnosticsSink,
    ) -> StatementReport {
        let (period, period_source) = match period {
            Some(p) => (p, PeriodSource::Override),
            None => {
                let lookup = lookup_period(text);
                if lookup.is_fallback() {
                    warn!(
                        source = source_identifier,
                        fallback = %lookup.period,
                        "no statement period found; using fallback"
                    );
                }
                (lookup.period, lookup.source)
            }
        };

        let transactions = self.run(text, period, sink);
        info!(
            source = source_identifier,
            %period,
            count = transactions.len(),
            "statement processed"
        );

        StatementReport {
            source_identifier: source_identifier.to_string(),
            period,
            period_source,
            transaction_count: transactions.len(),
            summary: summarize(&transactions),
            transactions,
        }
    }

    /// Extract text from a binary document, then [`process`](Self::process) it.
    /// Extraction failure is the only error.
    pub async fn process_document<E: TextExtractor>(
        &self,
        extractor: &E,
        source_identifier: &str,
        document: &[u8],
        period: Option<Period>,
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<StatementReport> {
        let text = extractor
            .extract_text(document)
            .await
            .with_context(|| format!("extracting text from {source_identifier}"))?;
        Ok(self.process(source_identifier, &text, period, sink))
    }
}

/// Reconstruct a statement's transactions with the default engine.
pub fn reconstruct_transactions(text: &str, period: Period) -> Vec<Transaction> {
    Engine::default().run(text, period, &mut TracingSink)
}
