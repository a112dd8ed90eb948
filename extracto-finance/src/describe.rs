//! Readable summaries of raw statement descriptions.
//!
//! Raw descriptions carry transfer codes, SPEI tracking keys and CLABE
//! numbers. SPEI detail lines are comma separated:
//! `SPEI, <BANK>, <account>, <PERSON>, ..., <concept>`.

use regex::Regex;
use std::sync::LazyLock;

static TRANSFER_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:TRA|INT)\s+").expect("valid regex"));
static SPEI_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"SPEI-\w+\s*").expect("valid regex"));
static CLABE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{13,}").expect("valid regex"));
static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d{3}-\d{2}/\d{2}/\d{4}/\d{2}-\d{3}\w+").expect("valid regex")
});
static LONG_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{6,}").expect("valid regex"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

const MAX_SUMMARY_CHARS: usize = 100;
const MAX_RAW_FALLBACK_CHARS: usize = 50;

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip codes and reference numbers, turning SPEI detail into
/// `"<concept> - <person> (<bank>)"`.
pub fn clean_description(raw: &str) -> String {
    let cleaned = TRANSFER_CODE.replace(raw, "");
    let cleaned = SPEI_KEY.replace_all(&cleaned, "");
    let cleaned = CLABE.replace_all(&cleaned, "");
    let cleaned = REFERENCE.replace_all(&cleaned, "").into_owned();

    if cleaned.contains("SPEI,") {
        if let Some(summary) = spei_summary(&cleaned) {
            return summary;
        }
    }

    let cleaned = LONG_NUMBER.replace_all(&collapse_whitespace(&cleaned), "").into_owned();
    let cleaned = collapse_whitespace(&cleaned);

    if cleaned.is_empty() {
        raw.chars().take(MAX_RAW_FALLBACK_CHARS).collect()
    } else {
        cleaned.chars().take(MAX_SUMMARY_CHARS).collect()
    }
}

fn spei_summary(cleaned: &str) -> Option<String> {
    let parts: Vec<&str> = cleaned.split(',').map(str::trim).collect();
    if parts.len() < 4 {
        return None;
    }

    let bank = parts[1].replace("MEXICO", "").trim().to_string();
    let person = collapse_whitespace(&DIGITS.replace_all(parts[3], ""));

    let concept = if parts.len() > 4 {
        parts
            .last()
            .filter(|p| p.chars().count() > 3 && !p.chars().all(|c| c.is_ascii_digit()))
            .map(|p| p.to_string())
    } else {
        None
    };

    Some(match concept {
        Some(concept) => format!("{concept} - {person} ({bank})"),
        None => format!("SPEI - {person} ({bank})"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_transfer_code_and_key() {
        assert_eq!(clean_description("TRA SPEI-GKNF348 NATALIA TIJERINA"), "NATALIA TIJERINA");
    }

    #[test]
    fn test_spei_detail_with_concept() {
        let raw = "INT SPEI, BBVA MEXICO, 012580001234567890, JUAN PEREZ 55, RENTA MARZO";
        assert_eq!(clean_description(raw), "RENTA MARZO - JUAN PEREZ (BBVA)");
    }

    #[test]
    fn test_spei_detail_without_concept() {
        let raw = "SPEI, BANORTE, 072580001234567890, MARIA LOPEZ";
        assert_eq!(clean_description(raw), "SPEI - MARIA LOPEZ (BANORTE)");
    }

    #[test]
    fn test_drops_reference_blob_and_long_numbers() {
        let raw = "PAGO 123-15/03/2024/01-456ABC SERVICIO 9876543 LUZ";
        assert_eq!(clean_description(raw), "PAGO SERVICIO LUZ");
    }

    #[test]
    fn test_falls_back_to_raw() {
        assert_eq!(clean_description("1234567890123456"), "1234567890123456");
    }
}
