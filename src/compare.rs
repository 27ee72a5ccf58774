// Comparison launcher: shows two normalized documents side by side in an installed diff viewer
// Falls back to a plain unified diff when nothing from the viewer list is installed

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::ExitStatus;
use std::sync::Arc;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::extractor::{temp_prefix, ToolCapability, ToolLocator};
use crate::pipeline::NormalizedDocument;
use crate::text_diff::unified_diff;

/// Viewers in order of preference, with the switches each needs
/// kdiff3 and meld render Unicode well; kdiff3 also wraps long sentence lines
pub const DEFAULT_VIEWERS: &[&str] = &[
    "kdiff3 --cs WordWrap=1 --cs ShowWhiteSpaceCharacters=0",
    "meld",
    "tkdiff",
    "xxdiff",
    "gvimdiff",
    "vimdiff",
    "diff",
    "opendiff",
];

#[derive(Debug, Error)]
pub enum LaunchError {
    /// Recoverable: callers fall back to a plain text diff
    #[error("could not find a suitable diff viewer from the list {0:?}")]
    NoViewerAvailable(Vec<String>),

    #[error("program '{preference}' not found, and no viewer from the list {known:?} starts with '{preference}'")]
    UnknownViewer { preference: String, known: Vec<String> },

    #[error("failed to launch {viewer}: {source}")]
    Spawn {
        viewer: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot materialize normalized text: {0}")]
    Io(#[from] std::io::Error),
}

/// Viewer list and fallback diff settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Viewer commands in priority order; the first word is the program
    pub viewers: Vec<String>,
    /// Context lines around each hunk of the fallback diff
    pub context_lines: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            viewers: DEFAULT_VIEWERS.iter().map(|v| v.to_string()).collect(),
            context_lines: 3,
        }
    }
}

/// A resolved viewer command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewer {
    pub command: String,
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl Viewer {
    pub fn name(&self) -> &str {
        program_name(&self.command)
    }
}

/// How the comparison was displayed
#[derive(Debug)]
pub enum CompareOutcome {
    /// A viewer ran; its exit status says nothing about whether differences exist
    Launched { viewer: String, status: ExitStatus },
    /// No viewer installed; the unified diff is returned for the caller to print
    Fallback { diff: String },
}

pub struct Launcher {
    config: ViewerConfig,
    preference: Option<String>,
    tools: Arc<dyn ToolLocator>,
}

impl Launcher {
    pub fn new(config: ViewerConfig, tools: Arc<dyn ToolLocator>) -> Self {
        Self {
            config,
            preference: None,
            tools,
        }
    }

    /// Prefer a viewer by name or name prefix
    ///
    /// Rejected up front when no known viewer starts with it and no such program is installed.
    pub fn with_preference(mut self, preference: impl Into<String>) -> Result<Self, LaunchError> {
        let preference = preference.into();
        let known_match = self
            .viewer_names()
            .iter()
            .any(|name| name.starts_with(&preference));

        if !known_match && !self.tools.locate(program_name(&preference)).is_available() {
            return Err(LaunchError::UnknownViewer {
                known: self.viewer_names().iter().map(|n| n.to_string()).collect(),
                preference,
            });
        }

        self.preference = Some(preference);
        Ok(self)
    }

    /// Program names of the configured viewers, without switches
    pub fn viewer_names(&self) -> Vec<&str> {
        self.config.viewers.iter().map(|v| program_name(v)).collect()
    }

    /// Commands to try, in order: the preference itself, known viewers matching it, then all
    pub fn candidates(&self) -> Vec<String> {
        let mut candidates: Vec<String> = Vec::new();
        if let Some(preference) = &self.preference {
            candidates.push(preference.clone());
            candidates.extend(
                self.config
                    .viewers
                    .iter()
                    .filter(|v| program_name(v).starts_with(preference.as_str()))
                    .cloned(),
            );
        }
        candidates.extend(self.config.viewers.iter().cloned());

        let mut seen = std::collections::HashSet::new();
        candidates.retain(|c| seen.insert(c.clone()));
        candidates
    }

    /// First installed viewer among the candidates
    pub fn find_viewer(&self) -> Result<Viewer, LaunchError> {
        for command in self.candidates() {
            let mut words = command.split_whitespace();
            let Some(name) = words.next() else {
                continue;
            };
            if let ToolCapability::Available(program) = self.tools.locate(name) {
                debug!("Selected viewer {} at {}", name, program.display());
                let args = words.map(str::to_string).collect();
                return Ok(Viewer {
                    command,
                    program,
                    args,
                });
            }
        }
        Err(LaunchError::NoViewerAvailable(
            self.viewer_names().iter().map(|n| n.to_string()).collect(),
        ))
    }

    /// Show the difference, falling back to a unified diff when no viewer is installed
    pub async fn compare(
        &self,
        left: &NormalizedDocument,
        right: &NormalizedDocument,
    ) -> Result<CompareOutcome, LaunchError> {
        match self.find_viewer() {
            Ok(viewer) => self.launch(&viewer, left, right).await,
            Err(LaunchError::NoViewerAvailable(tried)) => {
                warn!("No diff viewer installed (tried {:?}); printing a plain diff", tried);
                Ok(CompareOutcome::Fallback {
                    diff: self.plain_diff(left, right),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Unified diff of the two documents labelled with their source paths
    pub fn plain_diff(&self, left: &NormalizedDocument, right: &NormalizedDocument) -> String {
        unified_diff(
            &left.source.display().to_string(),
            &right.source.display().to_string(),
            &left.lines,
            &right.lines,
            self.config.context_lines,
        )
    }

    /// Write both documents to temporary files and run the viewer on them
    pub async fn launch(
        &self,
        viewer: &Viewer,
        left: &NormalizedDocument,
        right: &NormalizedDocument,
    ) -> Result<CompareOutcome, LaunchError> {
        let left_file = materialize(left).await?;
        let right_file = materialize(right).await?;

        info!(
            "Launching {} on {} and {}",
            viewer.name(),
            left_file.path().display(),
            right_file.path().display()
        );

        // WHY: viewer inherits stdio so console tools like diff print straight to the terminal
        let status = Command::new(&viewer.program)
            .args(&viewer.args)
            .arg(left_file.path())
            .arg(right_file.path())
            .status()
            .await
            .map_err(|source| LaunchError::Spawn {
                viewer: viewer.name().to_string(),
                source,
            })?;

        debug!("{} exited with {}", viewer.name(), status);
        Ok(CompareOutcome::Launched {
            viewer: viewer.name().to_string(),
            status,
        })
    }
}

/// Temporary `.txt` file holding the normalized lines, named after the source document
async fn materialize(document: &NormalizedDocument) -> Result<tempfile::NamedTempFile, LaunchError> {
    let file = tempfile::Builder::new()
        .prefix(&temp_prefix(&document.source))
        .suffix(".txt")
        .tempfile()?;
    tokio::fs::write(file.path(), document.to_text()).await?;
    Ok(file)
}

fn program_name(command: &str) -> &str {
    command.split_whitespace().next().unwrap_or(command)
}
