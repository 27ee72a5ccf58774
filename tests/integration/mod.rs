// Integration test utilities and common code
// WHY: Centralized utilities avoid duplication across integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary directory holding the documents a test compares
pub struct TestFixture {
    pub temp_dir: TempDir,
    pub root_path: PathBuf,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root_path = temp_dir.path().to_path_buf();

        Self {
            temp_dir,
            root_path,
        }
    }

    /// Write a document below the fixture root, creating parent directories
    pub fn create_document<P: AsRef<Path>>(&self, relative_path: P, content: &str) -> PathBuf {
        let file_path = self.root_path.join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write test document");
        file_path
    }

    /// Write a document as raw bytes
    pub fn create_binary_document<P: AsRef<Path>>(&self, relative_path: P, content: &[u8]) -> PathBuf {
        let file_path = self.root_path.join(relative_path);
        fs::write(&file_path, content).expect("Failed to write test document");
        file_path
    }
}

/// Greedy word wrap at `width` columns, the way a typesetter fills lines
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Compare normalized lines against golden lines, reporting the first mismatch
pub fn assert_golden_lines<S: AsRef<str>>(actual: &[S], expected: &[&str], context: &str) {
    for (i, (actual_line, expected_line)) in actual.iter().zip(expected.iter()).enumerate() {
        if actual_line.as_ref() != *expected_line {
            panic!(
                "{}: Line {} mismatch\nExpected: {}\nActual:   {}",
                context,
                i + 1,
                expected_line,
                actual_line.as_ref()
            );
        }
    }

    if actual.len() != expected.len() {
        panic!(
            "{}: Line count mismatch. Expected {} lines, got {} lines",
            context,
            expected.len(),
            actual.len()
        );
    }
}

/// Text with all whitespace removed
pub fn compact(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
