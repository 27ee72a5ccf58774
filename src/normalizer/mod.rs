// Text normalization core: turns layout-wrapped extracted text into one sentence per line
// Pure and infallible, so it can be tested without any extraction tool installed

use serde::{Deserialize, Serialize};
use tracing::debug;

pub mod abbreviations;
pub mod ligatures;
pub mod paragraphs;
pub mod sentences;
pub mod whitespace;

pub use abbreviations::AbbreviationChecker;
pub use ligatures::{expand_ligatures, expand_ligatures_into, LIGATURES};
pub use paragraphs::{JoinState, ParagraphJoiner};
pub use sentences::split_sentences;
pub use whitespace::{collapse_whitespace, collapse_whitespace_into};

/// Tunables for the boundary heuristics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Sentences at least this many characters long may also split after `,` `;` `:` (0 disables)
    pub clause_split_length: usize,
    /// A line shorter than this fraction of its longer neighbor may be a heading
    pub heading_ratio: f64,
    /// Characters after which an unclosed double quote no longer suppresses sentence splits
    pub max_quote_span: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            clause_split_length: 250,
            heading_ratio: 0.5,
            max_quote_span: 400,
        }
    }
}

/// Counters collected during one normalization run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationStats {
    pub raw_lines: usize,
    pub paragraphs: usize,
    pub sentences: usize,
    pub ligatures_expanded: usize,
    pub hyphenations_repaired: usize,
}

/// Reformats extracted text so that line-based diffs align with sentences
#[derive(Default)]
pub struct Normalizer {
    config: NormalizerConfig,
    checker: AbbreviationChecker,
}

impl Normalizer {
    pub fn with_config(config: NormalizerConfig) -> Self {
        Self {
            config,
            checker: AbbreviationChecker::new(),
        }
    }

    /// Normalize raw lines into canonical lines
    pub fn normalize<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        self.normalize_with_stats(lines).0
    }

    /// Normalize raw lines and report what the passes changed
    ///
    /// Elements containing embedded line breaks are split first, so a whole document passed
    /// as a single string is handled the same as its individual lines.
    pub fn normalize_with_stats<S: AsRef<str>>(&self, lines: &[S]) -> (Vec<String>, NormalizationStats) {
        let mut stats = NormalizationStats::default();

        // Pass 1 and per-line whitespace canonicalization
        let mut expanded = String::new();
        let mut prepared = Vec::with_capacity(lines.len());
        for raw_line in lines.iter().flat_map(|line| physical_lines(line.as_ref())) {
            stats.raw_lines += 1;
            stats.ligatures_expanded += expand_ligatures_into(raw_line, &mut expanded);
            prepared.push(collapse_whitespace(&expanded));
        }

        // Pass 2
        let paragraphs = ParagraphJoiner::new(&self.config, &self.checker).join_all(&prepared, &mut stats);

        // Pass 3, with one blank separator between paragraphs
        let mut output = Vec::with_capacity(paragraphs.len());
        for paragraph in &paragraphs {
            if !output.is_empty() {
                output.push(String::new());
            }
            for sentence in split_sentences(paragraph, &self.config, &self.checker) {
                output.push(sentence.to_string());
                stats.sentences += 1;
            }
        }

        debug!(
            raw_lines = stats.raw_lines,
            paragraphs = stats.paragraphs,
            sentences = stats.sentences,
            ligatures = stats.ligatures_expanded,
            hyphenations = stats.hyphenations_repaired,
            "Normalization complete"
        );

        (output, stats)
    }
}

/// Normalize with default settings
pub fn normalize<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    Normalizer::default().normalize(lines)
}

/// Normalize a whole text block with default settings
pub fn normalize_text(text: &str) -> Vec<String> {
    normalize(&[text])
}

/// Physical lines of one input element; an empty element is one blank line
fn physical_lines(element: &str) -> impl Iterator<Item = &str> {
    let blank = element.is_empty().then_some("");
    blank.into_iter().chain(element.lines())
}
