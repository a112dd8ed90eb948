//! extracto-finance: direction rules, category rules, description cleanup and summaries

pub mod category_rules;
pub mod describe;
pub mod direction_rules;
pub mod matching;
pub mod summary;

pub use category_rules::{CategoryRule, CategoryRules, categorize};
pub use describe::clean_description;
pub use direction_rules::{
    Classification, DirectionRule, DirectionRuleFile, DirectionRules, RuleTier,
};
pub use matching::{Pattern, fold};
pub use summary::{CategoryTotal, StatementSummary, summarize};

/// Classify with the built-in direction table.
pub fn classify(description: &str) -> extracto_core::Direction {
    DirectionRules::default().classify(description)
}
