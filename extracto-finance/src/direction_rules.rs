//! Deterministic debit/credit classification.
//!
//! Statements never say which column an amount came from once the table is
//! flattened to text, so direction is inferred from the description. The
//! rules form an ordered table of `(pattern, verdict)` pairs evaluated in
//! three tiers:
//!
//! 1. credit markers (incoming transfers, deposits, income codes)
//! 2. debit markers (outgoing transfers, commissions, fees, withdrawals)
//! 3. known counterparties (recipients of past outgoing transfers)
//!
//! First match wins. Anything unmatched is a debit: outgoing transfers
//! dominate these statements and an unexplained line is more often a charge
//! than a credit. That is a heuristic bias, not a guarantee.

use anyhow::{Context, Result};
use extracto_core::Direction;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::matching::{Pattern, fold};

/// Evaluation tier. Lower tiers are tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTier {
    CreditMarker,
    DebitMarker,
    Counterparty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionRule {
    /// Rule ID, reported in diagnostics
    pub id: String,
    pub tier: RuleTier,
    pub pattern: Pattern,
    pub verdict: Direction,
}

impl DirectionRule {
    pub fn new(id: &str, tier: RuleTier, pattern: Pattern, verdict: Direction) -> Self {
        Self {
            id: id.to_string(),
            tier,
            pattern,
            verdict,
        }
    }
}

/// Outcome of classifying one description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub direction: Direction,
    /// `None` when the default applied
    pub rule_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DirectionRules {
    rules: Vec<DirectionRule>,
    default: Direction,
}

impl DirectionRules {
    /// An empty table: everything falls through to the default.
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            default: Direction::Debit,
        }
    }

    /// Build from a list; rules are ordered by tier, keeping list order within a tier.
    pub fn from_rules(rules: Vec<DirectionRule>) -> Self {
        let mut table = Self::empty();
        table.extend(rules);
        table
    }

    pub fn with_default(mut self, default: Direction) -> Self {
        self.default = default;
        self
    }

    pub fn add_rule(&mut self, rule: DirectionRule) {
        self.extend(std::iter::once(rule));
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = DirectionRule>) {
        self.rules.extend(rules);
        // Stable: insertion order survives inside each tier.
        self.rules.sort_by_key(|r| r.tier);
    }

    pub fn rules(&self) -> &[DirectionRule] {
        &self.rules
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn default_direction(&self) -> Direction {
        self.default
    }

    pub fn classify(&self, description: &str) -> Direction {
        self.classify_detailed(description).direction
    }

    pub fn classify_detailed(&self, description: &str) -> Classification {
        let folded = fold(description);
        for rule in &self.rules {
            if rule.pattern.matches(&folded) {
                return Classification {
                    direction: rule.verdict,
                    rule_id: Some(rule.id.clone()),
                };
            }
        }

        Classification {
            direction: self.default,
            rule_id: None,
        }
    }
}

impl Default for DirectionRules {
    fn default() -> Self {
        Self::from_rules(default_rules())
    }
}

/// On-disk rule file.
///
/// ```toml
/// default = "debit"
///
/// [[rules]]
/// id = "nomina"
/// tier = "credit_marker"
/// pattern = { contains = "nomina" }
/// verdict = "credit"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectionRuleFile {
    pub default: Option<Direction>,
    #[serde(default)]
    pub rules: Vec<DirectionRule>,
}

impl DirectionRuleFile {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse direction rules")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .with_context(|| format!("read rules file {}", path.display()))?;
        Self::from_toml_str(&s).with_context(|| format!("in {}", path.display()))
    }

    /// Merge into the built-in table, or replace it entirely.
    pub fn into_rules(self, replace_defaults: bool) -> DirectionRules {
        let mut table = if replace_defaults {
            DirectionRules::empty()
        } else {
            DirectionRules::default()
        };
        table.extend(self.rules);
        if let Some(d) = self.default {
            table = table.with_default(d);
        }
        debug!(
            rules = table.rule_count(),
            replace_defaults,
            default = %table.default_direction(),
            "direction rules loaded"
        );
        table
    }
}

/// Built-in vocabulary for the Banregio statement layout.
pub fn default_rules() -> Vec<DirectionRule> {
    use Direction::{Credit, Debit};
    use RuleTier::{Counterparty, CreditMarker, DebitMarker};

    let credit = [
        ("spei-recibido", Pattern::contains("spei recibido")),
        ("transfer-received", Pattern::contains("recibida")),
        ("received", Pattern::contains("recibido")),
        ("transfer-to-genki", Pattern::contains("transferencia a genki")),
        ("incoming-transfer", Pattern::contains("transferencia a")),
        ("deposit", Pattern::contains("deposito")),
        ("credit-abono", Pattern::contains("abono")),
        ("income", Pattern::contains("ingreso")),
        ("payroll", Pattern::contains("nomina")),
        ("refund", Pattern::contains("devolucion")),
        ("payer-la-fresita", Pattern::contains("la fresita")),
    ];

    let debit = [
        ("transfer-from-genki", Pattern::contains("transferencia de genki")),
        ("spei-enviado", Pattern::contains("spei enviado")),
        ("transfer-sent", Pattern::contains("enviada")),
        ("outgoing-transfer", Pattern::contains("transferencia de")),
        ("commission", Pattern::contains("comision")),
        ("account-management", Pattern::contains("manejo de cuenta")),
        ("administration-fee", Pattern::contains("administracion")),
        ("withdrawal", Pattern::contains("retiro")),
        ("payment", Pattern::contains("pago")),
        ("charge", Pattern::contains("cargo")),
    ];

    let counterparties = [("counterparty-natalia-tijerina", "natalia tijerina")];

    let mut rules = Vec::new();
    rules.extend(
        credit
            .into_iter()
            .map(|(id, p)| DirectionRule::new(id, CreditMarker, p, Credit)),
    );
    rules.extend(
        debit
            .into_iter()
            .map(|(id, p)| DirectionRule::new(id, DebitMarker, p, Debit)),
    );
    rules.extend(
        counterparties
            .into_iter()
            .map(|(id, name)| DirectionRule::new(id, Counterparty, Pattern::contains(name), Debit)),
    );
    rules
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_markers() {
        let rules = DirectionRules::default();
        assert_eq!(rules.classify("DEPOSITO EN EFECTIVO SUC 12"), Direction::Credit);
        assert_eq!(rules.classify("Depósito SPEI"), Direction::Credit);
        assert_eq!(rules.classify("ABONO TRANSFERENCIA"), Direction::Credit);
        assert_eq!(rules.classify("SPEI RECIBIDO BBVA MEXICO"), Direction::Credit);
    }

    #[test]
    fn test_debit_markers() {
        let rules = DirectionRules::default();
        assert_eq!(rules.classify("COMISION MANEJO DE CUENTA"), Direction::Debit);
        assert_eq!(rules.classify("RETIRO CAJERO AUTOMATICO"), Direction::Debit);

        let c = rules.classify_detailed("Comisión por administración");
        assert_eq!(c.rule_id.as_deref(), Some("commission"));
    }

    #[test]
    fn test_credit_tier_wins_over_debit() {
        // "deposito" (credit) and "comision" (debit) both match; credit tier runs first.
        let rules = DirectionRules::default();
        let c = rules.classify_detailed("DEVOLUCION COMISION DEPOSITO");
        assert_eq!(c.direction, Direction::Credit);
    }

    #[test]
    fn test_transfer_wording_sets_direction() {
        let rules = DirectionRules::default();
        let c = rules.classify_detailed("TRANSFERENCIA A CUENTA 0581234");
        assert_eq!(c.direction, Direction::Credit);
        assert_eq!(c.rule_id.as_deref(), Some("incoming-transfer"));

        let c = rules.classify_detailed("TRANSFERENCIA DE GENKI SA DE CV");
        assert_eq!(c.direction, Direction::Debit);
        assert_eq!(c.rule_id.as_deref(), Some("transfer-from-genki"));
    }

    #[test]
    fn test_counterparty_rule() {
        let rules = DirectionRules::default();
        let c = rules.classify_detailed("TRA SPEI-GKNF348 NATALIA TIJERINA");
        assert_eq!(c.direction, Direction::Debit);
        assert_eq!(c.rule_id.as_deref(), Some("counterparty-natalia-tijerina"));
    }

    #[test]
    fn test_default_is_debit() {
        let rules = DirectionRules::default();
        let c = rules.classify_detailed("XYZ 123 SIN DESCRIPCION CONOCIDA");
        assert_eq!(c.direction, Direction::Debit);
        assert_eq!(c.rule_id, None);
    }

    #[test]
    fn test_tier_ordering_survives_append() {
        let mut rules = DirectionRules::empty();
        rules.add_rule(DirectionRule::new(
            "late-debit",
            RuleTier::DebitMarker,
            Pattern::contains("acme"),
            Direction::Debit,
        ));
        rules.add_rule(DirectionRule::new(
            "acme-credit",
            RuleTier::CreditMarker,
            Pattern::contains("acme"),
            Direction::Credit,
        ));
        assert_eq!(rules.rules()[0].id, "acme-credit");
        assert_eq!(rules.classify("PAGO ACME"), Direction::Credit);
    }

    #[test]
    fn test_rule_file_extends_defaults() {
        let file = DirectionRuleFile::from_toml_str(
            r#"
[[rules]]
id = "client-acme"
tier = "credit_marker"
pattern = { contains = "ACME SA DE CV" }
verdict = "credit"
"#,
        )
        .unwrap();

        let rules = file.into_rules(false);
        assert_eq!(rules.rule_count(), default_rules().len() + 1);
        assert_eq!(rules.classify("TRA SPEI ACME SA DE CV"), Direction::Credit);
        assert_eq!(rules.classify("COMISION"), Direction::Debit);
    }

    #[test]
    fn test_rule_file_replaces_defaults() {
        let file = DirectionRuleFile::from_toml_str(
            r#"
default = "credit"

[[rules]]
id = "fees"
tier = "debit_marker"
pattern = { starts_with = "com" }
verdict = "debit"
"#,
        )
        .unwrap();

        let rules = file.into_rules(true);
        assert_eq!(rules.rule_count(), 1);
        assert_eq!(rules.classify("COMISION"), Direction::Debit);
        assert_eq!(rules.classify("RETIRO"), Direction::Credit);
    }

    #[test]
    fn test_bad_rule_file() {
        assert!(DirectionRuleFile::from_toml_str("[[rules]]\nid = 3").is_err());
    }
}
