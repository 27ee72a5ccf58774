// Extraction followed by normalization for one or two documents
// Two documents are processed concurrently; neither depends on the other

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};
use tracing::info;

use crate::extractor::{ExtractionError, Extractor};
use crate::normalizer::{NormalizationStats, Normalizer};

/// Canonical text of one document together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDocument {
    pub source: PathBuf,
    pub lines: Vec<String>,
}

impl NormalizedDocument {
    /// Lines joined with newlines, newline-terminated unless empty
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }
}

/// Per-document processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DocumentReport {
    /// Document path as given on the command line
    pub path: String,
    /// Extraction time in milliseconds
    pub extraction_time_ms: u64,
    /// Normalization time in milliseconds
    pub normalization_time_ms: u64,
    #[serde(flatten)]
    pub stats: NormalizationStats,
}

/// Extract and normalize a single document
pub async fn process_document(
    extractor: &Extractor,
    normalizer: &Normalizer,
    path: &Path,
) -> Result<(NormalizedDocument, DocumentReport), ExtractionError> {
    let extraction_start = Instant::now();
    let raw_lines = extractor.extract(path).await?;
    let extraction_time_ms = extraction_start.elapsed().as_millis() as u64;

    let normalization_start = Instant::now();
    let (lines, stats) = normalizer.normalize_with_stats(&raw_lines);
    let normalization_time_ms = normalization_start.elapsed().as_millis() as u64;

    info!(
        "Normalized {}: {} raw lines -> {} sentences in {}ms",
        path.display(),
        stats.raw_lines,
        stats.sentences,
        normalization_time_ms
    );

    let report = DocumentReport {
        path: path.display().to_string(),
        extraction_time_ms,
        normalization_time_ms,
        stats,
    };
    let document = NormalizedDocument {
        source: path.to_path_buf(),
        lines,
    };
    Ok((document, report))
}

/// Process two documents concurrently, failing on the first extraction error
pub async fn process_pair(
    extractor: &Extractor,
    normalizer: &Normalizer,
    left: &Path,
    right: &Path,
) -> Result<[(NormalizedDocument, DocumentReport); 2], ExtractionError> {
    let (left, right) = tokio::try_join!(
        process_document(extractor, normalizer, left),
        process_document(extractor, normalizer, right)
    )?;
    Ok([left, right])
}

/// Stream normalized lines to a writer, one per line
pub async fn write_lines<W: AsyncWrite + Unpin>(writer: W, lines: &[String]) -> std::io::Result<()> {
    let mut writer = BufWriter::new(writer);
    for line in lines {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
    }
    writer.flush().await
}

/// Write per-document reports as pretty JSON
pub async fn write_reports(path: &Path, reports: &[DocumentReport]) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    tokio::fs::write(path, json).await
}
