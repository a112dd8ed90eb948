//! extracto-ingest: statement text ingestion, transaction reconstruction and the top-level pipeline.

pub mod dates;
pub mod dedup;
pub mod diagnostics;
pub mod extract;
pub mod parsers;
pub mod period;
pub mod pipeline;
pub mod types;

pub use dates::{DateSource, ResolvedDate, resolve_date};
pub use dedup::finalize;
pub use diagnostics::{
    DiagnosticsSink, DiscardReason, NullSink, RecordingSink, TraceEvent, TracingSink,
};
pub use extract::{PlainText, TextExtractor};
pub use parsers::banregio::{Reconstructor, reconstruct, segment_lines};
pub use period::{PeriodLookup, extract_period, find_period, lookup_period};
pub use pipeline::{Engine, reconstruct_transactions};
pub use types::{EngineConfig, RawTransactionCandidate, StatementReport};
