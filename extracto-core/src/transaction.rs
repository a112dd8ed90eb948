//! Finalized statement transactions and their classification enums.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Money direction relative to the account holder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Cargo: money leaving the account.
    Debit,
    /// Abono: money entering the account.
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Debit => "debit",
            Direction::Credit => "credit",
        }
    }

    /// Apply this direction's sign to a magnitude: debits negative, credits positive.
    pub fn signed(&self, magnitude: Decimal) -> Decimal {
        match self {
            Direction::Debit => -magnitude.abs(),
            Direction::Credit => magnitude.abs(),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse spending categories assigned by keyword rules
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Fees,
    Transfers,
    Income,
    Services,
    Payments,
    Withdrawals,
    Uncategorized,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Fees => "Fees",
            Category::Transfers => "Transfers",
            Category::Income => "Income",
            Category::Services => "Services",
            Category::Payments => "Payments",
            Category::Withdrawals => "Withdrawals",
            Category::Uncategorized => "Uncategorized",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A reconstructed, classified and dated statement line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Serialized as `YYYY-MM-DD`
    pub transaction_date: NaiveDate,
    /// Normalized description as harvested from the statement
    pub description: String,
    /// Human-friendly rendering of `description`
    pub summary: String,
    /// Negative = debit, positive = credit. Never zero.
    pub amount: Decimal,
    pub transaction_type: Direction,
    pub category: Category,
}

impl Transaction {
    /// Create a transaction; `magnitude` is signed according to `direction`.
    pub fn new(
        transaction_date: NaiveDate,
        description: impl Into<String>,
        summary: impl Into<String>,
        magnitude: Decimal,
        direction: Direction,
        category: Category,
    ) -> Self {
        Self {
            transaction_date,
            description: description.into(),
            summary: summary.into(),
            amount: direction.signed(magnitude),
            transaction_type: direction,
            category,
        }
    }

    pub fn is_debit(&self) -> bool {
        self.transaction_type == Direction::Debit
    }

    pub fn is_credit(&self) -> bool {
        self.transaction_type == Direction::Credit
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}
