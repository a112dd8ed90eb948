use extracto_core::{Category, Direction, Period, PeriodSource, Transaction};
use extracto_ingest::dedup::{DEFAULT_PREFIX_LEN, dedup_key};
use extracto_ingest::{
    DateSource, Engine, EngineConfig, RecordingSink, TraceEvent, extract_period, reconstruct_transactions,
};
use rust_decimal::Decimal;
use std::collections::HashSet;

const MARZO_2024: &str = include_str!("fixtures/banregio_marzo_2024.txt");
const ABRIL_2024: &str = include_str!("fixtures/banregio_abril_2024.txt");

fn march() -> Period {
    Period::new(2024, 3).unwrap()
}

fn dates(txns: &[Transaction]) -> Vec<String> {
    txns.iter().map(|t| t.transaction_date.to_string()).collect()
}

#[test]
fn test_period_phrase() {
    let p = extract_period("ESTADO DE CUENTA del 01 al 31 de MARZO 2024");
    assert_eq!(p.month(), 3);
    assert_eq!(p.year(), 2024);
}

#[test]
fn test_amount_anchor_without_day_falls_back_to_period_start() {
    let text = "2,500.00    15,430.00\nTRA SPEI-GKNF348\nNATALIA TIJERINA";
    let mut sink = RecordingSink::new();
    let txns = Engine::default().run(text, march(), &mut sink);

    assert_eq!(txns.len(), 1);
    let t = &txns[0];
    assert_eq!(t.description, "TRA SPEI-GKNF348 NATALIA TIJERINA");
    assert_eq!(t.abs_amount(), Decimal::new(250000, 2));
    assert_eq!(t.transaction_type, Direction::Debit);
    assert_eq!(t.transaction_date.to_string(), "2024-03-01");

    // Debit came from the recipient-name rule, not the default.
    assert!(sink.events.iter().any(|e| matches!(
        e,
        TraceEvent::Classified { rule_id: Some(id), .. } if id == "counterparty-natalia-tijerina"
    )));
}

#[test]
fn test_standalone_day_is_captured() {
    let text = "2,500.00    15,430.00\n18\nTRA SPEI-GKNF348\nNATALIA TIJERINA";
    let txns = reconstruct_transactions(text, march());
    assert_eq!(txns.len(), 1);
    assert_eq!(txns[0].transaction_date.to_string(), "2024-03-18");
    assert_eq!(txns[0].description, "TRA SPEI-GKNF348 NATALIA TIJERINA");
}

#[test]
fn test_embedded_date_overrides_day_and_period() {
    let text = "2,500.00    15,430.00\n18\nPAGO REFERENCIA 15/03/2024\nNATALIA TIJERINA";
    let mut sink = RecordingSink::new();
    let txns = Engine::default().run(text, Period::new(2023, 7).unwrap(), &mut sink);
    assert_eq!(txns[0].transaction_date.to_string(), "2024-03-15");
    assert!(sink.events.iter().any(|e| matches!(
        e,
        TraceEvent::DateResolved { source: DateSource::Explicit, .. }
    )));
}

#[test]
fn test_duplicate_candidates_collapse_to_first() {
    let text = "\
2,500.00    15,430.00
TRA SPEI-GKNF348
NATALIA TIJERINA
2,500.00    12,930.00
TRA SPEI-GKNF348
NATALIA TIJERINA";
    let mut sink = RecordingSink::new();
    let txns = Engine::default().run(text, march(), &mut sink);
    assert_eq!(txns.len(), 1);
    assert_eq!(
        sink.count(|e| matches!(e, TraceEvent::DuplicateDropped { .. })),
        1
    );
}

#[test]
fn test_fixture_statement() {
    let report = Engine::default().process("banregio_marzo_2024.pdf", MARZO_2024, None, &mut RecordingSink::new());
    assert_eq!(report.period, march());
    assert_eq!(report.period_source, PeriodSource::Declared);
    assert_eq!(report.transaction_count, 7);

    let t = &report.transactions;
    assert_eq!(
        dates(t),
        vec![
            "2024-03-04",
            "2024-03-06",
            "2024-03-09",
            "2024-03-15",
            "2024-03-20",
            "2024-03-31",
            "2024-03-31",
        ]
    );

    assert_eq!(t[1].description, "INT SPEI RECIBIDO LA FRESITA SA DE CV");
    assert_eq!(t[1].transaction_type, Direction::Credit);
    assert_eq!(t[1].category, Category::Transfers);

    assert_eq!(t[2].amount, Decimal::new(-116100, 2));
    assert_eq!(t[3].category, Category::Income);
    assert_eq!(t[3].amount, Decimal::new(1000000, 2));
    assert_eq!(t[4].category, Category::Services);
    assert_eq!(t[5].category, Category::Fees);
    assert_eq!(t[6].description, "IVA COMISION MANEJO DE CUENTA");

    assert_eq!(report.summary.total_credits, Decimal::new(1070500, 2));
    assert_eq!(report.summary.total_debits, Decimal::new(468500, 2));
}

#[test]
fn test_table_closes_at_total_line() {
    let report = Engine::default().process("banregio_abril_2024.pdf", ABRIL_2024, None, &mut RecordingSink::new());
    assert_eq!(report.period, Period::new(2024, 4).unwrap());
    assert_eq!(report.transaction_count, 3);

    let t = &report.transactions;
    assert_eq!(dates(t), vec!["2024-04-02", "2024-04-08", "2024-04-19"]);

    // Counterparty wording inside the table does not end it.
    assert_eq!(t[0].description, "TRA SPEI-PQ7710 DISENO GRAFICO MONTERREY SA");
    assert_eq!(t[0].amount, Decimal::new(-320000, 2));
    assert_eq!(t[1].transaction_type, Direction::Credit);

    // The totals line right after the last concept is not part of it.
    assert_eq!(t[2].description, "PAGO SALDO MINIMO TARJETA");
    assert_eq!(t[2].category, Category::Payments);
    assert_eq!(t[2].amount, Decimal::new(-45000, 2));

    assert_eq!(report.summary.total_credits, Decimal::new(150000, 2));
    assert_eq!(report.summary.total_debits, Decimal::new(365000, 2));
}

#[test]
fn test_unbounded_scan_reads_past_table() {
    let april = Period::new(2024, 4).unwrap();
    let bounded = reconstruct_transactions(ABRIL_2024, april);
    let engine = Engine::new(EngineConfig {
        bound_sections: false,
        ..EngineConfig::default()
    });
    let unbounded = engine.run(ABRIL_2024, april, &mut RecordingSink::new());

    assert_eq!(bounded.len(), 3);
    assert_eq!(unbounded.len(), 4);
    // The summary amount lands on the period start; the first two movements match.
    assert_eq!(unbounded[0].abs_amount(), Decimal::new(500000, 2));
    assert_eq!(unbounded[1..3], bounded[..2]);
    assert!(unbounded[3].description.contains("Total 3,650.00"));
}

#[test]
fn test_fixture_excludes_summary_block() {
    let txns = reconstruct_transactions(MARZO_2024, march());
    assert!(txns.iter().all(|t| t.abs_amount() != Decimal::new(1293000, 2)));
}

#[test]
fn test_idempotent() {
    let a = reconstruct_transactions(MARZO_2024, march());
    let b = reconstruct_transactions(MARZO_2024, march());
    assert_eq!(a, b);
}

#[test]
fn test_sorted_by_date() {
    let txns = reconstruct_transactions(MARZO_2024, march());
    for w in txns.windows(2) {
        assert!(w[0].transaction_date <= w[1].transaction_date);
    }
}

#[test]
fn test_dates_within_period_unless_explicit() {
    let period = Period::new(2024, 4).unwrap();
    let mut sink = RecordingSink::new();
    let txns = Engine::default().run(MARZO_2024, period, &mut sink);

    let explicit = sink.count(|e| {
        matches!(e, TraceEvent::DateResolved { source: DateSource::Explicit, .. })
    });
    let outside = txns.iter().filter(|t| !period.contains(t.transaction_date)).count();
    // Only the 09/03/2024 reference escapes April.
    assert_eq!(explicit, 1);
    assert_eq!(outside, 1);
    // Day 31 clamps to April 30.
    assert!(dates(&txns).contains(&"2024-04-30".to_string()));
}

#[test]
fn test_no_duplicate_keys() {
    let txns = reconstruct_transactions(MARZO_2024, march());
    let keys: HashSet<_> = txns.iter().map(|t| dedup_key(t, DEFAULT_PREFIX_LEN)).collect();
    assert_eq!(keys.len(), txns.len());
}

#[test]
fn test_sign_matches_type() {
    let txns = reconstruct_transactions(MARZO_2024, march());
    assert!(!txns.is_empty());
    for t in &txns {
        assert!(!t.amount.is_zero());
        assert_eq!(t.amount < Decimal::ZERO, t.transaction_type == Direction::Debit);
        assert_eq!(t.amount > Decimal::ZERO, t.transaction_type == Direction::Credit);
    }
}

#[test]
fn test_report_json_shape() {
    let report = Engine::default().process("s", MARZO_2024, None, &mut RecordingSink::new());
    let v = serde_json::to_value(&report).unwrap();
    assert_eq!(v["transaction_count"], 7);
    assert_eq!(v["period"]["month"], 3);
    assert_eq!(v["period_source"], "declared");
    assert_eq!(v["transactions"][0]["transaction_date"], "2024-03-04");
    assert_eq!(v["transactions"][0]["amount"], "-2500.00");
}
