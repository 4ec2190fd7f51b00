//! Persisting a checkpoint outside the process. `serde_json` gives a
//! human-debuggable format for inspection and bug reports; `bincode` gives a
//! compact format for production checkpoint storage at scale. Both ride on
//! the same `Serialize`/`DeserializeOwned` bound every stage's `State`
//! already carries — nothing stage-specific lives here.

use std::io::{Read, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{PipelineError, Result};

fn wrap_io(path: &Path, source: impl std::error::Error + Send + Sync + 'static) -> PipelineError {
    PipelineError::Io {
        path: path.to_path_buf(),
        source: anyhow::Error::new(source),
    }
}

pub fn save_checkpoint_json<S: Serialize>(path: &Path, state: &S) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(state).map_err(|e| wrap_io(path, e))?;
    std::fs::File::create(path)
        .and_then(|mut f| f.write_all(&bytes))
        .map_err(|e| wrap_io(path, e))
}

pub fn load_checkpoint_json<S: DeserializeOwned>(path: &Path) -> Result<S> {
    let bytes = std::fs::read(path).map_err(|e| wrap_io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| wrap_io(path, e))
}

pub fn save_checkpoint_bincode<S: Serialize>(path: &Path, state: &S) -> Result<()> {
    let bytes = bincode::serialize(state).map_err(|e| wrap_io(path, e))?;
    std::fs::File::create(path)
        .and_then(|mut f| f.write_all(&bytes))
        .map_err(|e| wrap_io(path, e))
}

pub fn load_checkpoint_bincode<S: DeserializeOwned>(path: &Path) -> Result<S> {
    let mut bytes = Vec::new();
    std::fs::File::open(path)
        .and_then(|mut f| f.read_to_end(&mut bytes))
        .map_err(|e| wrap_io(path, e))?;
    bincode::deserialize(&bytes).map_err(|e| wrap_io(path, e))
}
