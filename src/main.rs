use std::path::PathBuf;

use anyhow::Result;
use infinistream::{chunked_dataset_iterator, init_tracing_once, ChunkedDatasetConfig, CheckpointableIterator};

const CORPUS_DIR: &str = "./data";

fn main() -> Result<()> {
    init_tracing_once();

    let cfg = ChunkedDatasetConfig::default()
        .with_paths([PathBuf::from(CORPUS_DIR)])
        .with_shuffle(true)
        .with_buffer_size(10_000)
        .with_seed(42);

    let mut dataset = chunked_dataset_iterator(cfg, None::<fn(infinistream::LineResult) -> infinistream::LineResult>)?;

    let mut shown = 0;
    while shown < 10 {
        match dataset.next() {
            Some(Ok(line)) => {
                println!("{line}");
                shown += 1;
            }
            Some(Err(e)) => tracing::error!(error = %e, "skipping unreadable chunk"),
            None => break,
        }
    }

    Ok(())
}
