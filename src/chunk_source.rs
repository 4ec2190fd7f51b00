//! External collaborators, per spec's scope: the concrete gzip line reader
//! and the directory-to-chunk-paths enumerator. Both are out of scope of the
//! core iterator algebra and are "thin glue, trivially re-implementable" —
//! kept deliberately small, with no retry/backoff machinery of their own.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use walkdir::WalkDir;

/// Decompress `path` as gzip and split it into lines, stripping universal
/// newline terminators. A trailing empty line after the final terminator is
/// dropped, matching Python's `str.splitlines()` semantics that the source
/// library relies on.
pub fn read_gzip_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut decoder = GzDecoder::new(file);
    let mut text = String::new();
    decoder
        .read_to_string(&mut text)
        .with_context(|| format!("decompress {}", path.display()))?;

    let mut lines: Vec<String> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();
    if lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    Ok(lines)
}

/// Enumerate every `.gz` file directly under `paths`, sorted lexicographically
/// by filename so the chunk order is stable across operating systems.
pub fn discover_chunks(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut chunks = Vec::new();
    for dir in paths {
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.with_context(|| format!("scan {}", dir.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().and_then(|e| e.to_str()) == Some("gz") {
                chunks.push(entry.path().to_path_buf());
            }
        }
    }
    chunks.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(chunks)
}
