use anyhow::{Context, Result, bail};
use extracto_ingest::{PlainText, TextExtractor};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::config::ExtractSection;

/// `pdftotext` reading the PDF from stdin and writing text to stdout.
#[derive(Debug, Clone)]
pub struct PdfToText {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl PdfToText {
    /// Resolve the configured command on PATH.
    pub fn locate(section: &ExtractSection) -> Result<Self> {
        let program = which::which(&section.pdftotext_command).map_err(|_| {
            anyhow::anyhow!(
                "{} not found on PATH.\n\
\nFix: install poppler-utils (apt install poppler-utils / brew install poppler)\n\
or set extract.pdftotext_command in ~/.extracto/config.toml.",
                section.pdftotext_command
            )
        })?;
        Ok(Self {
            program,
            args: section.pdftotext_args.clone(),
            timeout: Duration::from_secs(section.timeout_secs.max(1)),
        })
    }

    async fn run(&self, document: Vec<u8>) -> Result<String> {
        debug!(program = %self.program.display(), bytes = document.len(), "running pdftotext");
        let mut child = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .args(["-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("spawning {}", self.program.display()))?;

        let mut stdin = child.stdin.take().context("missing stdin")?;
        let writer = tokio::spawn(async move {
            let res = stdin.write_all(&document).await;
            drop(stdin);
            res
        });

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| anyhow::anyhow!("pdftotext timed out after {:?}", self.timeout))?
            .context("waiting for pdftotext")?;

        // A broken pipe here just means pdftotext gave up early; its exit status says why.
        let _ = writer.await;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("pdftotext exited with {}: {}", output.status, stderr.trim());
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        if text.trim().is_empty() {
            bail!("pdftotext produced no text (scanned statement?)");
        }
        Ok(text)
    }
}

impl TextExtractor for PdfToText {
    fn extract_text(&self, document: &[u8]) -> impl Future<Output = Result<String>> + Send {
        self.run(document.to_vec())
    }
}

/// Picks an extractor per document.
#[derive(Debug, Clone)]
pub enum Extractor {
    Pdf(PdfToText),
    Text(PlainText),
}

impl Extractor {
    pub fn for_document(path: &Path, document: &[u8], section: &ExtractSection) -> Result<Self> {
        if looks_like_pdf(path, document) {
            Ok(Self::Pdf(PdfToText::locate(section)?))
        } else {
            Ok(Self::Text(PlainText))
        }
    }
}

impl TextExtractor for Extractor {
    fn extract_text(&self, document: &[u8]) -> impl Future<Output = Result<String>> + Send {
        async move {
            match self {
                Self::Pdf(p) => p.extract_text(document).await,
                Self::Text(t) => t.extract_text(document).await,
            }
        }
    }
}

pub fn looks_like_pdf(path: &Path, document: &[u8]) -> bool {
    document.starts_with(b"%PDF")
        || path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
