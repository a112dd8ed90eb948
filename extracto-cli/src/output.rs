use anyhow::{Context, Result};
use clap::ValueEnum;
use extracto_core::Transaction;
use extracto_ingest::StatementReport;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Csv,
    Table,
}

pub fn write_report<W: Write>(out: &mut W, report: &StatementReport, format: Format) -> Result<()> {
    match format {
        Format::Json => write_json(out, report),
        Format::Csv => write_csv(out, &report.transactions),
        Format::Table => write_table(out, report),
    }
}

pub fn write_json<W: Write>(out: &mut W, report: &StatementReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report).context("serialize report")?;
    writeln!(out)?;
    Ok(())
}

#[derive(Serialize)]
struct CsvRow<'a> {
    date: String,
    description: &'a str,
    summary: &'a str,
    amount: Decimal,
    #[serde(rename = "type")]
    transaction_type: &'static str,
    category: &'static str,
}

pub fn write_csv<W: Write>(out: &mut W, txns: &[Transaction]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for t in txns {
        wtr.serialize(CsvRow {
            date: t.transaction_date.to_string(),
            description: &t.description,
            summary: &t.summary,
            amount: t.amount,
            transaction_type: t.transaction_type.as_str(),
            category: t.category.label(),
        })
        .context("write csv row")?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_table<W: Write>(out: &mut W, report: &StatementReport) -> Result<()> {
    writeln!(
        out,
        "{}  period {} ({:?})  {} transactions",
        report.source_identifier, report.period, report.period_source, report.transaction_count
    )?;
    writeln!(out)?;
    for t in &report.transactions {
        writeln!(
            out,
            "{}  {:>12}  {:<6}  {:<13}  {}",
            t.transaction_date,
            t.amount.to_string(),
            t.transaction_type.as_str(),
            t.category.label(),
            t.summary
        )?;
    }

    let s = &report.summary;
    writeln!(out)?;
    writeln!(out, "Credits: {}", s.total_credits)?;
    writeln!(out, "Debits:  {}", s.total_debits)?;
    writeln!(out, "Net:     {}", s.net)?;
    for c in &s.by_category {
        writeln!(
            out,
            "  - {:<13} {:>3} txns  {}",
            c.category.label(),
            c.transaction_count,
            c.total_amount
        )?;
    }
    Ok(())
}
