pub mod compare;
pub mod config;
pub mod extractor;
pub mod normalizer;
pub mod pipeline;
pub mod text_diff;

// Re-export main types for convenient access
pub use normalizer::{
    normalize, normalize_text,
    NormalizationStats, Normalizer, NormalizerConfig
};

pub use extractor::{
    DocumentKind, ExtractionError, Extractor, ExtractorConfig,
    StaticToolLocator, SystemToolLocator, ToolCapability, ToolLocator
};

pub use compare::{CompareOutcome, LaunchError, Launcher, ViewerConfig};
pub use config::{ConfigError, PdfDiffConfig};
pub use pipeline::{process_document, process_pair, DocumentReport, NormalizedDocument};
pub use text_diff::unified_diff;
