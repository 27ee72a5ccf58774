// Extractor adapter: turns a document on disk into raw text lines
// PostScript goes through ps2pdf, PDF through pdftotext, anything else is read as text

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Arc;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

pub mod reader;
pub mod tools;

pub use reader::{read_text_lines, ReadStats, ReaderConfig};
pub use tools::{StaticToolLocator, SystemToolLocator, ToolCapability, ToolLocator};

/// Failures that abort processing of one input document
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("could not find '{tool}', which is needed for {purpose}")]
    ToolUnavailable { tool: String, purpose: &'static str },

    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{tool}' failed on {} ({status}): {stderr}", .input.display())]
    ToolFailed {
        tool: String,
        input: PathBuf,
        status: String,
        stderr: String,
    },

    #[error("I/O error during extraction: {0}")]
    Io(#[from] std::io::Error),
}

/// How a document is turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PostScript,
    Text,
}

impl DocumentKind {
    /// Map a `file --brief` word or a file extension to a kind; unknown labels are text
    pub fn from_label(label: &str) -> Self {
        match label.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" | "fdf" => DocumentKind::Pdf,
            "postscript" | "ps" => DocumentKind::PostScript,
            _ => DocumentKind::Text,
        }
    }

    /// Guess from the path extension alone
    pub fn from_extension(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(DocumentKind::Text, Self::from_label)
    }
}

/// Programs and switches used for conversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub pdftotext_program: String,
    pub pdftotext_args: Vec<String>,
    pub ps2pdf_program: String,
    /// Program used to sniff file types; the extension is used when it is missing
    pub file_program: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            pdftotext_program: "pdftotext".to_string(),
            // WHY: page breaks would otherwise appear as form feeds inside paragraphs
            pdftotext_args: vec!["-nopgbrk".into(), "-enc".into(), "UTF-8".into()],
            ps2pdf_program: "ps2pdf".to_string(),
            file_program: "file".to_string(),
        }
    }
}

/// Converts documents to raw text using whatever tools the locator reports
pub struct Extractor {
    config: ExtractorConfig,
    reader_config: ReaderConfig,
    tools: Arc<dyn ToolLocator>,
}

impl Extractor {
    pub fn new(config: ExtractorConfig, tools: Arc<dyn ToolLocator>) -> Self {
        Self {
            config,
            reader_config: ReaderConfig::default(),
            tools,
        }
    }

    /// Extractor using programs found on `PATH`
    pub fn system(config: ExtractorConfig) -> Self {
        Self::new(config, Arc::new(SystemToolLocator))
    }

    /// Determine the document kind, preferring `file --brief` over the extension
    pub async fn detect_kind(&self, path: &Path) -> DocumentKind {
        if let ToolCapability::Available(file_program) = self.tools.locate(&self.config.file_program) {
            match Command::new(&file_program).arg("--brief").arg(path).output().await {
                Ok(output) if output.status.success() => {
                    let description = String::from_utf8_lossy(&output.stdout);
                    if let Some(first_word) = description.split_whitespace().next() {
                        let kind = DocumentKind::from_label(first_word);
                        debug!("{} identified as {:?} ({})", path.display(), kind, description.trim());
                        return kind;
                    }
                }
                Ok(output) => debug!("file exited with {} for {}", output.status, path.display()),
                Err(e) => debug!("Failed to run file on {}: {}", path.display(), e),
            }
        }

        DocumentKind::from_extension(path)
    }

    /// Extract raw text lines from a document
    ///
    /// Empty output is not an error, but it says nothing about whether two documents match.
    pub async fn extract(&self, path: &Path) -> Result<Vec<String>, ExtractionError> {
        tokio::fs::metadata(path)
            .await
            .map_err(|source| ExtractionError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;

        let kind = self.detect_kind(path).await;
        info!("Extracting {} as {:?}", path.display(), kind);

        let lines = match kind {
            DocumentKind::Text => read_text_lines(path, &self.reader_config).await?.0,
            DocumentKind::Pdf => self.pdf_to_text(path).await?,
            DocumentKind::PostScript => {
                // Intermediate PDF lives until text extraction is done
                let pdf = self.ps_to_pdf(path).await?;
                self.pdf_to_text(pdf.path()).await?
            }
        };

        if lines.iter().all(|line| line.trim().is_empty()) {
            warn!(
                "No text extracted from {}; an empty result does not imply the document matches anything",
                path.display()
            );
        }

        Ok(lines)
    }

    async fn pdf_to_text(&self, input: &Path) -> Result<Vec<String>, ExtractionError> {
        let program = self.require(
            &self.config.pdftotext_program,
            "pdf to text conversion (pdftotext ships with poppler-utils and xpdf)",
        )?;

        let output = Command::new(&program)
            .args(&self.config.pdftotext_args)
            .arg(input)
            .arg("-")
            .output()
            .await?;
        check_status(&self.config.pdftotext_program, input, &output)?;

        Ok(reader::decode_lines(&output.stdout))
    }

    async fn ps_to_pdf(&self, input: &Path) -> Result<tempfile::NamedTempFile, ExtractionError> {
        let program = self.require(&self.config.ps2pdf_program, "ps to pdf conversion")?;

        let pdf = tempfile::Builder::new()
            .prefix(&temp_prefix(input))
            .suffix(".pdf")
            .tempfile()?;

        let output = Command::new(&program).arg(input).arg(pdf.path()).output().await?;
        check_status(&self.config.ps2pdf_program, input, &output)?;

        debug!("Converted {} to {}", input.display(), pdf.path().display());
        Ok(pdf)
    }

    fn require(&self, program: &str, purpose: &'static str) -> Result<PathBuf, ExtractionError> {
        match self.tools.locate(program) {
            ToolCapability::Available(path) => Ok(path),
            ToolCapability::Unavailable => Err(ExtractionError::ToolUnavailable {
                tool: program.to_string(),
                purpose,
            }),
        }
    }
}

fn check_status(tool: &str, input: &Path, output: &Output) -> Result<(), ExtractionError> {
    if output.status.success() {
        return Ok(());
    }
    Err(ExtractionError::ToolFailed {
        tool: tool.to_string(),
        input: input.to_path_buf(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Temporary file prefix derived from the document's stem, e.g. `paper_` for `paper.pdf`
pub fn temp_prefix(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");
    format!("{stem}_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_label() {
        assert_eq!(DocumentKind::from_label("PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_label("fdf"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_label("PostScript"), DocumentKind::PostScript);
        assert_eq!(DocumentKind::from_label(".ps"), DocumentKind::PostScript);
        assert_eq!(DocumentKind::from_label("ASCII"), DocumentKind::Text);
        assert_eq!(DocumentKind::from_label("UTF-8"), DocumentKind::Text);
    }

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(DocumentKind::from_extension(Path::new("a/paper.PDF")), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_extension(Path::new("fig.ps")), DocumentKind::PostScript);
        assert_eq!(DocumentKind::from_extension(Path::new("notes.txt")), DocumentKind::Text);
        assert_eq!(DocumentKind::from_extension(Path::new("README")), DocumentKind::Text);
    }

    #[test]
    fn test_temp_prefix() {
        assert_eq!(temp_prefix(Path::new("/tmp/paper-v2.pdf")), "paper-v2_");
        assert_eq!(temp_prefix(Path::new("/")), "document_");
    }

    #[test]
    fn test_error_messages() {
        let err = ExtractionError::ToolUnavailable {
            tool: "pdftotext".to_string(),
            purpose: "pdf to text conversion",
        };
        assert_eq!(
            err.to_string(),
            "could not find 'pdftotext', which is needed for pdf to text conversion"
        );
    }

    #[tokio::test]
    async fn test_missing_tool_reported() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("paper.pdf");
        std::fs::write(&path, b"%PDF-1.4\n").unwrap();

        let extractor = Extractor::new(ExtractorConfig::default(), Arc::new(StaticToolLocator::new()));
        let result = extractor.extract(&path).await;
        match result {
            Err(ExtractionError::ToolUnavailable { tool, .. }) => assert_eq!(tool, "pdftotext"),
            other => panic!("expected ToolUnavailable, got {other:?}"),
        }
    }
}
