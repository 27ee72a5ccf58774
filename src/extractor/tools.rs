// Capability lookup for external programs
// Extraction and viewer launch only ever ask "is this tool here, and where", so tests can inject
// a fixed answer instead of depending on what the host has installed

use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Whether an external program can be invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolCapability {
    Available(PathBuf),
    Unavailable,
}

impl ToolCapability {
    pub fn is_available(&self) -> bool {
        matches!(self, ToolCapability::Available(_))
    }
}

/// Resolves program names to executables
pub trait ToolLocator: Send + Sync {
    fn locate(&self, program: &str) -> ToolCapability;
}

/// Searches `PATH` the way a shell would
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemToolLocator;

impl ToolLocator for SystemToolLocator {
    fn locate(&self, program: &str) -> ToolCapability {
        match which::which(program) {
            Ok(path) => {
                debug!("Found {} at {}", program, path.display());
                ToolCapability::Available(path)
            }
            Err(e) => {
                debug!("{} not available: {}", program, e);
                ToolCapability::Unavailable
            }
        }
    }
}

/// Fixed table of available programs, for embedding and tests
#[derive(Debug, Default, Clone)]
pub struct StaticToolLocator {
    tools: HashMap<String, PathBuf>,
}

impl StaticToolLocator {
    /// Locator that reports every program as unavailable
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tool(mut self, program: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.tools.insert(program.into(), path.into());
        self
    }
}

impl ToolLocator for StaticToolLocator {
    fn locate(&self, program: &str) -> ToolCapability {
        self.tools
            .get(program)
            .map_or(ToolCapability::Unavailable, |path| ToolCapability::Available(path.clone()))
    }
}
