// Optional TOML configuration; every section and field falls back to its default

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

use crate::compare::ViewerConfig;
use crate::extractor::ExtractorConfig;
use crate::normalizer::NormalizerConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Top-level configuration
///
/// ```toml
/// [extractor]
/// pdftotext_args = ["-nopgbrk", "-enc", "UTF-8", "-layout"]
///
/// [viewer]
/// viewers = ["meld", "diff -u"]
///
/// [normalizer]
/// clause_split_length = 120
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfDiffConfig {
    pub extractor: ExtractorConfig,
    pub viewer: ViewerConfig,
    pub normalizer: NormalizerConfig,
}

impl PdfDiffConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load configuration from a TOML file
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let config = Self::from_toml(&text, path)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path).await,
            None => Ok(Self::default()),
        }
    }
}
