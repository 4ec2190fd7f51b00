//! `SelectMany` specialized to decompress a gzip chunk file into its lines.
//! See spec §4.3.

use std::path::PathBuf;

use crate::checkpoint::CheckpointableIterator;
use crate::chunk_source::read_gzip_lines;
use crate::error::ReadError;
use crate::select_many::SelectMany;

/// Items flow as `Result<String, ReadError>`, the same shape `BufRead::lines()`
/// already uses in the standard library: a bad chunk surfaces as a single
/// `Err` item rather than being swallowed, satisfying spec's "no stage
/// silently swallows errors" while letting the pipeline move on to the next
/// chunk on the following `next()` call. `ReadError` (not `anyhow::Error`)
/// carries the failure so the item stays `Clone`/`Serialize`, which every
/// generic downstream stage (`BufferedShuffle`, `Map`, ...) requires of its
/// item type for checkpointing.
pub type LineResult = Result<String, ReadError>;

pub type ChunkedReadlines<Up> =
    SelectMany<Up, LineResult, Box<dyn FnMut(&PathBuf) -> Vec<LineResult>>>;

pub fn chunked_readlines<Up>(chunk_paths: Up) -> ChunkedReadlines<Up>
where
    Up: CheckpointableIterator<Item = PathBuf>,
{
    let expand: Box<dyn FnMut(&PathBuf) -> Vec<LineResult>> =
        Box::new(|path: &PathBuf| match read_gzip_lines(path) {
            Ok(lines) => lines.into_iter().map(Ok).collect(),
            Err(e) => {
                let err = ReadError::from(e);
                tracing::warn!(path = %path.display(), error = %err, "failed to read chunk");
                vec![Err(err)]
            }
        });
    SelectMany::new(chunk_paths, expand)
}
