//! Document-to-text seam.
//!
//! Turning a binary statement into text (pdftotext, OCR, ...) happens
//! outside the engine. Failures here are fatal for the document: with no
//! text there is nothing to reconstruct.

use anyhow::{Context, Result};
use std::future::Future;

pub trait TextExtractor {
    fn extract_text(&self, document: &[u8]) -> impl Future<Output = Result<String>> + Send;
}

/// Documents that are already text (UTF-8, optional BOM).
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainText;

impl PlainText {
    pub fn decode(document: &[u8]) -> Result<String> {
        let bytes = document.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(document);
        let text = std::str::from_utf8(bytes).context("document is not valid UTF-8 text")?;
        Ok(text.to_string())
    }
}

impl TextExtractor for PlainText {
    fn extract_text(&self, document: &[u8]) -> impl Future<Output = Result<String>> + Send {
        std::future::ready(Self::decode(document))
    }
}
