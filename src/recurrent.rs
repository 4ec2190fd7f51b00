//! Stateful recurrence over a step function, and the `SamplingRandomMap`
//! specialization that threads a seeded PRNG through it. See spec §4.8, §4.9.

use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointableIterator;
use crate::rng::new_rng;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurrentState<S, U> {
    pub recurrent_state: S,
    pub upstream_state: U,
}

/// Threads a user state `S` through upstream items via `step(state, item) ->
/// (new_state, output)`. Unlike `SelectMany`, there is no pre/post snapshot
/// subtlety: both `recurrent_state` and the upstream's own state are fully
/// advanced by the time a checkpoint is taken, since `step` already ran to
/// completion for every item that's been emitted.
pub struct Recurrent<Up, S, V, F>
where
    Up: CheckpointableIterator,
    S: Clone + Serialize + DeserializeOwned,
    F: FnMut(S, Up::Item) -> (S, V),
{
    upstream: Up,
    step: F,
    initial_state: S,
    recurrent_state: S,
}

impl<Up, S, V, F> Recurrent<Up, S, V, F>
where
    Up: CheckpointableIterator,
    S: Clone + Serialize + DeserializeOwned,
    F: FnMut(S, Up::Item) -> (S, V),
{
    pub fn new(mut upstream: Up, step: F, initial_state: S) -> Self {
        upstream.set_state(None);
        Self {
            upstream,
            step,
            recurrent_state: initial_state.clone(),
            initial_state,
        }
    }
}

impl<Up, S, V, F> CheckpointableIterator for Recurrent<Up, S, V, F>
where
    Up: CheckpointableIterator,
    S: Clone + std::fmt::Debug + Serialize + DeserializeOwned,
    F: FnMut(S, Up::Item) -> (S, V),
{
    type Item = V;
    type State = RecurrentState<S, Up::State>;

    fn next(&mut self) -> Option<V> {
        let item = self.upstream.next()?;
        let state = self.recurrent_state.clone();
        let (new_state, output) = (self.step)(state, item);
        self.recurrent_state = new_state;
        Some(output)
    }

    fn get_state(&self) -> Self::State {
        RecurrentState {
            recurrent_state: self.recurrent_state.clone(),
            upstream_state: self.upstream.get_state(),
        }
    }

    fn set_state(&mut self, state: Option<Self::State>) {
        match state {
            None => {
                self.recurrent_state = self.initial_state.clone();
                self.upstream.set_state(None);
            }
            Some(s) => {
                self.recurrent_state = s.recurrent_state;
                self.upstream.set_state(Some(s.upstream_state));
            }
        }
    }
}

pub type SamplingRandomMapState<U> = RecurrentState<ChaCha8Rng, U>;

pub type SamplingRandomMap<Up, V> =
    Recurrent<Up, ChaCha8Rng, V, Box<dyn FnMut(ChaCha8Rng, <Up as CheckpointableIterator>::Item) -> (ChaCha8Rng, V)>>;

/// Calls `transform(rng, item)` on each item, handing it a checkpointed RNG
/// so randomized transforms (dropout, token masking, sampling augmentation)
/// replay identically from any checkpoint.
pub fn sampling_random_map<Up, V, F>(upstream: Up, seed: u64, mut transform: F) -> SamplingRandomMap<Up, V>
where
    Up: CheckpointableIterator,
    F: FnMut(&mut ChaCha8Rng, Up::Item) -> V + 'static,
    Up::Item: 'static,
    V: 'static,
{
    let step: Box<dyn FnMut(ChaCha8Rng, Up::Item) -> (ChaCha8Rng, V)> =
        Box::new(move |mut rng: ChaCha8Rng, item: Up::Item| {
            let output = transform(&mut rng, item);
            (rng, output)
        });
    Recurrent::new(upstream, step, new_rng(seed))
}
