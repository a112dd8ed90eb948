//! Deterministic category rules mapping statement descriptions to
//! coarse spending categories.
//!
//! Priority: fees > transfers > income > services > payments > withdrawals > uncategorized.

use extracto_core::Category;
use serde::{Deserialize, Serialize};

use crate::matching::{Pattern, fold};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub category: Category,
    pub patterns: Vec<Pattern>,
}

#[derive(Debug, Clone)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    pub fn from_rules(rules: Vec<CategoryRule>) -> Self {
        Self { rules }
    }

    pub fn categorize(&self, description: &str) -> Category {
        let desc = fold(description);
        self.rules
            .iter()
            .find(|rule| rule.patterns.iter().any(|p| p.matches(&desc)))
            .map(|rule| rule.category)
            .unwrap_or(Category::Uncategorized)
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::from_rules(default_rules())
    }
}

/// Categorize with the built-in keyword table.
pub fn categorize(description: &str) -> Category {
    CategoryRules::default().categorize(description)
}

fn rule(category: Category, patterns: Vec<Pattern>) -> CategoryRule {
    CategoryRule { category, patterns }
}

pub fn default_rules() -> Vec<CategoryRule> {
    let c = Pattern::contains;
    vec![
        // Commissions and account administration
        rule(
            Category::Fees,
            vec![c("comision"), c("administracion"), c("manejo de cuenta"), c("anualidad")],
        ),
        // SPEI / wires. TRA and INT are the statement's transfer codes.
        rule(
            Category::Transfers,
            vec![
                c("spei"),
                c("transferencia"),
                c("traspaso"),
                Pattern::starts_with("tra "),
                Pattern::starts_with("int "),
            ],
        ),
        rule(
            Category::Income,
            vec![c("deposito"), c("abono"), c("ingreso"), c("nomina")],
        ),
        rule(
            Category::Services,
            vec![
                c("cfe"),
                c("telmex"),
                c("totalplay"),
                c("izzi"),
                c("telcel"),
                c("netflix"),
                c("spotify"),
                c("amazon"),
                c("uber"),
                c("oxxo"),
                c("servicio"),
            ],
        ),
        rule(Category::Payments, vec![c("pago")]),
        rule(Category::Withdrawals, vec![c("retiro"), c("cajero")]),
    ]
}
