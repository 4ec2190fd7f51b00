use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use rayon::prelude::*;

/// Write a gzip chunk file containing `lines` joined by `\n`, with a
/// trailing newline — mirrors how a real corpus chunk is produced.
pub fn write_gz_lines(path: &Path, lines: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = GzEncoder::new(f, Compression::default());
    for line in lines {
        writeln!(&mut enc, "{line}").unwrap();
    }
    enc.finish().unwrap();
}

/// Write a gzip chunk file using the raw bytes verbatim (no trailing newline
/// normalization), to exercise mixed line-ending handling.
pub fn write_gz_raw(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = GzEncoder::new(f, Compression::default());
    enc.write_all(contents).unwrap();
    enc.finish().unwrap();
}

/// A tiny multi-chunk corpus matching the four-chunk, fourteen-item scenario:
/// `[["one","two","three","four"], ["five"], ["six".."eleven"], ["twelve".."fourteen"]]`.
pub fn make_basic_corpus() -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.into_path();

    write_gz_lines(&base.join("chunk_000.gz"), &["one", "two", "three", "four"]);
    write_gz_lines(&base.join("chunk_001.gz"), &["five"]);
    write_gz_lines(
        &base.join("chunk_002.gz"),
        &["six", "seven", "eight", "nine", "ten", "eleven"],
    );
    write_gz_lines(&base.join("chunk_003.gz"), &["twelve", "thirteen", "fourteen"]);

    base
}

pub fn expected_basic_corpus_lines() -> Vec<&'static str> {
    vec![
        "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
        "twelve", "thirteen", "fourteen",
    ]
}

/// A many-chunk corpus for exercising `InfinitePermutation` and
/// `BufferedShuffle` at a scale where a handful of hand-written chunks
/// wouldn't catch shard-stride or reservoir-size bugs. Chunk files are
/// independent, so writing them is embarrassingly parallel.
pub fn make_large_corpus(num_chunks: usize, lines_per_chunk: usize) -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.into_path();

    (0..num_chunks).into_par_iter().for_each(|chunk_idx| {
        let lines: Vec<String> = (0..lines_per_chunk)
            .map(|line_idx| format!("chunk{chunk_idx:04}-line{line_idx:04}"))
            .collect();
        let line_refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        write_gz_lines(&base.join(format!("chunk_{chunk_idx:04}.gz")), &line_refs);
    });

    base
}
