mod bucketed_batch;
mod buffered_shuffle;
mod checkpoint;
mod checkpoint_io;
mod chunk_source;
mod chunked_readlines;
mod dataset;
mod either;
mod error;
mod map;
mod permutation;
mod prefetch;
mod recurrent;
mod rng;
mod select_many;
mod telemetry;
mod windowed;
mod zip;

pub use crate::bucketed_batch::{BatchSize, BucketedBatchState, BucketedReadaheadBatch};
pub use crate::buffered_shuffle::{BufferedShuffle, BufferedShuffleState};
pub use crate::checkpoint::{CheckpointableIterator, StdIter};
pub use crate::checkpoint_io::{
    load_checkpoint_bincode, load_checkpoint_json, save_checkpoint_bincode, save_checkpoint_json,
};
pub use crate::chunk_source::{discover_chunks, read_gzip_lines};
pub use crate::chunked_readlines::{chunked_readlines, ChunkedReadlines, LineResult};
pub use crate::dataset::{chunked_dataset_iterator, ChunkedDataset, ChunkedDatasetConfig};
pub use crate::either::{Either, EitherState};
pub use crate::error::{PipelineError, ReadError, Result};
pub use crate::map::Map;
pub use crate::permutation::{InfinitePermutation, PermutationState};
pub use crate::prefetch::{Prefetch, PrefetchState};
pub use crate::recurrent::{
    sampling_random_map, Recurrent, RecurrentState, SamplingRandomMap, SamplingRandomMapState,
};
pub use crate::rng::{bump_seed, new_rng, shuffle as shuffle_slice, uniform_below};
pub use crate::select_many::{SelectMany, SelectManyState};
pub use crate::telemetry::init_tracing_once;
pub use crate::windowed::{Windowed, WindowedState};
pub use crate::zip::{Zip, Zip2, Zip2State};
