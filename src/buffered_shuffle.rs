//! Bounded-memory reservoir shuffle. See spec §4.4.

use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointableIterator;
use crate::error::{PipelineError, Result};
use crate::rng::{new_rng, uniform_below};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BufferedShuffleState<S, T> {
    pub upstream_state: Option<S>,
    pub buffer: Vec<Option<T>>,
    pub rng: ChaCha8Rng,
}

pub struct BufferedShuffle<Up>
where
    Up: CheckpointableIterator,
    Up::Item: Clone + Serialize + DeserializeOwned + std::fmt::Debug,
{
    upstream: Up,
    seed: u64,
    buffer: Vec<Option<Up::Item>>,
    rng: ChaCha8Rng,
    upstream_exhausted: bool,
    /// `None` while still consuming upstream; `Some(draining_from)` once
    /// upstream ends, walking the reservoir last-to-first.
    drain_pos: Option<usize>,
}

impl<Up> BufferedShuffle<Up>
where
    Up: CheckpointableIterator,
    Up::Item: Clone + Serialize + DeserializeOwned + std::fmt::Debug,
{
    pub fn new(mut upstream: Up, buffer_size: usize, seed: u64) -> Result<Self> {
        if buffer_size < 1 {
            return Err(PipelineError::Configuration(
                "BufferedShuffle requires buffer_size >= 1".into(),
            ));
        }
        upstream.set_state(None);
        Ok(Self {
            upstream,
            seed,
            buffer: vec![None; buffer_size],
            rng: new_rng(seed),
            upstream_exhausted: false,
            drain_pos: None,
        })
    }
}

impl<Up> CheckpointableIterator for BufferedShuffle<Up>
where
    Up: CheckpointableIterator,
    Up::Item: Clone + Serialize + DeserializeOwned + std::fmt::Debug,
{
    type Item = Up::Item;
    type State = BufferedShuffleState<Up::State, Up::Item>;

    fn next(&mut self) -> Option<Up::Item> {
        loop {
            if let Some(pos) = self.drain_pos {
                let mut i = pos;
                while i > 0 {
                    i -= 1;
                    if let Some(item) = self.buffer[i].take() {
                        self.drain_pos = Some(i);
                        return Some(item);
                    }
                }
                self.drain_pos = Some(0);
                return None;
            }

            if self.upstream_exhausted {
                self.drain_pos = Some(self.buffer.len());
                continue;
            }

            match self.upstream.next() {
                Some(item) => {
                    let idx = uniform_below(&mut self.rng, self.buffer.len() as u64) as usize;
                    let evicted = self.buffer[idx].take();
                    // Store before emit: a checkpoint taken right after this
                    // call never needs to replay the emitted value.
                    self.buffer[idx] = Some(item);
                    if let Some(evicted) = evicted {
                        return Some(evicted);
                    }
                    // else: slot was empty, nothing to emit yet.
                }
                None => {
                    self.upstream_exhausted = true;
                }
            }
        }
    }

    fn get_state(&self) -> Self::State {
        BufferedShuffleState {
            upstream_state: Some(self.upstream.get_state()),
            buffer: self.buffer.clone(),
            rng: self.rng.clone(),
        }
    }

    fn set_state(&mut self, state: Option<Self::State>) {
        match state {
            None => {
                self.upstream.set_state(None);
                self.buffer = vec![None; self.buffer.len()];
                self.rng = new_rng(self.seed);
                self.upstream_exhausted = false;
                self.drain_pos = None;
            }
            Some(s) => {
                self.upstream.set_state(s.upstream_state);
                self.buffer = s.buffer;
                self.rng = s.rng;
                self.upstream_exhausted = false;
                self.drain_pos = None;
            }
        }
    }
}
