use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by pipeline construction and by stages that touch I/O.
///
/// Construction errors (`Configuration`) are non-recoverable and are raised
/// eagerly, before the first `next()` call, so a caller never gets a
/// half-built pipeline. `Io` wraps failures from the external reader
/// collaborator; the checkpoint captured before the failing `next()` remains
/// valid for retry against a freshly constructed pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("io error reading {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// A chunk-read failure flattened to a message. Carried *as an item* through
/// `ChunkedReadlines`'s output rather than aborting the stream, so a bad
/// chunk surfaces to the consumer without poisoning the whole checkpoint
/// protocol — `anyhow::Error` can't ride inside a checkpointed item because
/// it isn't `Clone`/`Serialize`, so the failure is recorded as plain text.
#[derive(Debug, Clone, Serialize, Deserialize, Error)]
#[error("{0}")]
pub struct ReadError(pub String);

impl From<anyhow::Error> for ReadError {
    fn from(e: anyhow::Error) -> Self {
        ReadError(format!("{e:#}"))
    }
}
