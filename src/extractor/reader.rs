use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

use super::ExtractionError;

/// Configuration for plain-text reading
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            buffer_size: 8192, // WHY: 8KB is optimal for most filesystems and network storage
        }
    }
}

/// Statistics for one read
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
    /// Some bytes were not valid UTF-8 and were replaced
    pub lossy: bool,
}

/// Read a text file line by line with async buffered I/O
///
/// Invalid UTF-8 is replaced rather than rejected: extracted text is often contaminated and
/// normalization is best-effort.
pub async fn read_text_lines<P: AsRef<Path>>(
    file_path: P,
    config: &ReaderConfig,
) -> Result<(Vec<String>, ReadStats), ExtractionError> {
    let path = file_path.as_ref();
    let start_time = std::time::Instant::now();

    debug!("Starting async read of file: {}", path.display());

    let file = File::open(path).await.map_err(|source| ExtractionError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = BufReader::with_capacity(config.buffer_size, file);
    let mut raw = Vec::new();
    let mut result_lines = Vec::new();
    let mut byte_count = 0u64;
    let mut lossy = false;

    loop {
        raw.clear();
        let read = reader
            .read_until(b'\n', &mut raw)
            .await
            .map_err(|source| ExtractionError::Unreadable {
                path: path.to_path_buf(),
                source,
            })?;
        if read == 0 {
            break;
        }
        byte_count += read as u64;

        let line = strip_line_ending(&raw);
        match std::str::from_utf8(line) {
            Ok(text) => result_lines.push(text.to_string()),
            Err(_) => {
                lossy = true;
                result_lines.push(String::from_utf8_lossy(line).into_owned());
            }
        }
    }

    let stats = ReadStats {
        file_path: path.display().to_string(),
        lines_read: result_lines.len() as u64,
        bytes_read: byte_count,
        duration_ms: start_time.elapsed().as_millis() as u64,
        lossy,
    };

    if lossy {
        warn!("{} contains invalid UTF-8; affected bytes were replaced", path.display());
    }
    info!(
        "Read {}: {} lines, {} bytes in {}ms",
        path.display(),
        stats.lines_read,
        stats.bytes_read,
        stats.duration_ms
    );

    Ok((result_lines, stats))
}

/// Split captured tool output into lines, replacing invalid UTF-8
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(str::to_string)
        .collect()
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
