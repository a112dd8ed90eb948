//! Statement summary: totals grouped by category and direction.

use extracto_core::{Category, Transaction};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Totals for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub transaction_count: usize,
    /// Signed sum (credits minus debits)
    pub total_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementSummary {
    pub total_credits: Decimal,
    /// Sum of debit magnitudes (positive)
    pub total_debits: Decimal,
    pub net: Decimal,
    pub by_category: Vec<CategoryTotal>,
}

/// Group transactions by category. Largest movement first.
///
/// Sums saturate at `Decimal::MAX` instead of overflowing.
pub fn summarize(txns: &[Transaction]) -> StatementSummary {
    let mut groups: HashMap<Category, (usize, Decimal)> = HashMap::new();
    let mut total_credits = Decimal::ZERO;
    let mut total_debits = Decimal::ZERO;

    for txn in txns {
        let entry = groups.entry(txn.category).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 = entry.1.saturating_add(txn.amount);

        if txn.is_credit() {
            total_credits = total_credits.saturating_add(txn.abs_amount());
        } else {
            total_debits = total_debits.saturating_add(txn.abs_amount());
        }
    }

    let mut by_category: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, (count, total))| CategoryTotal {
            category,
            transaction_count: count,
            total_amount: total,
        })
        .collect();

    // Category breaks ties so the order never depends on HashMap iteration.
    by_category.sort_by(|a, b| {
        b.total_amount
            .abs()
            .cmp(&a.total_amount.abs())
            .then(a.category.cmp(&b.category))
    });

    StatementSummary {
        total_credits,
        total_debits,
        net: total_credits.saturating_sub(total_debits),
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use extracto_core::Direction;

    fn txn(day: u32, desc: &str, cents: i64, dir: Direction, cat: Category) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            desc,
            desc,
            Decimal::new(cents, 2),
            dir,
            cat,
        )
    }

    #[test]
    fn test_summarize_totals() {
        let txns = vec![
            txn(1, "TRA SPEI UNO", 250000, Direction::Debit, Category::Transfers),
            txn(2, "TRA SPEI DOS", 100000, Direction::Debit, Category::Transfers),
            txn(3, "DEPOSITO", 500000, Direction::Credit, Category::Income),
            txn(4, "COMISION", 15000, Direction::Debit, Category::Fees),
        ];

        let s = summarize(&txns);
        assert_eq!(s.total_credits, Decimal::new(500000, 2));
        assert_eq!(s.total_debits, Decimal::new(365000, 2));
        assert_eq!(s.net, Decimal::new(135000, 2));

        assert_eq!(s.by_category[0].category, Category::Income);
        assert_eq!(s.by_category[1].category, Category::Transfers);
        assert_eq!(s.by_category[1].transaction_count, 2);
        assert_eq!(s.by_category[1].total_amount, Decimal::new(-350000, 2));
        assert_eq!(s.by_category[2].category, Category::Fees);
    }

    #[test]
    fn test_summarize_empty() {
        let s = summarize(&[]);
        assert_eq!(s.net, Decimal::ZERO);
        assert!(s.by_category.is_empty());
    }

    #[test]
    fn test_summarize_saturates() {
        let huge = Decimal::MAX;
        let txns = vec![
            txn(1, "DEPOSITO EN EFECTIVO UNO", 0, Direction::Credit, Category::Income),
            txn(2, "DEPOSITO EN EFECTIVO DOS", 0, Direction::Credit, Category::Income),
        ]
        .into_iter()
        .map(|mut t| {
            t.amount = huge;
            t
        })
        .collect::<Vec<_>>();

        let s = summarize(&txns);
        assert_eq!(s.total_credits, Decimal::MAX);
        assert_eq!(s.net, Decimal::MAX);
        assert_eq!(s.by_category[0].total_amount, Decimal::MAX);
    }
}
