//! Infinite sharded reshuffle of a finite, in-memory item set. See spec §4.1.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointableIterator;
use crate::error::{PipelineError, Result};
use crate::rng::{new_rng, shuffle};

/// `{ rng_state_before_current_pass, items_consumed_in_current_pass }`.
///
/// `items_consumed` counts unsharded positions within the pass, which is
/// what makes the shard stride deterministic across a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermutationState {
    pub rng: ChaCha8Rng,
    pub items_consumed: u64,
}

pub struct InfinitePermutation<T> {
    original_items: Vec<T>,
    seed: Option<u64>,
    shuffle: bool,
    num_instances: u64,
    instance_rank: u64,

    rng: ChaCha8Rng,
    /// RNG state as it stood right before the current pass was shuffled;
    /// this, not `rng`, is what `get_state` reports.
    pass_start_rng: ChaCha8Rng,
    items_consumed: u64,
    current_pass: Vec<T>,
    pass_pos: usize,
}

impl<T: Clone> InfinitePermutation<T> {
    pub fn new(
        items: Vec<T>,
        seed: Option<u64>,
        shuffle: bool,
        num_instances: u64,
        instance_rank: u64,
    ) -> Result<Self> {
        if items.is_empty() {
            return Err(PipelineError::Configuration(
                "InfinitePermutation requires a non-empty item set".into(),
            ));
        }
        if instance_rank >= num_instances {
            return Err(PipelineError::Configuration(format!(
                "instance_rank ({instance_rank}) must be < num_instances ({num_instances})"
            )));
        }
        let rng = new_rng(seed.unwrap_or(0));
        let mut it = Self {
            original_items: items,
            seed,
            shuffle,
            num_instances,
            instance_rank,
            pass_start_rng: rng.clone(),
            rng,
            items_consumed: 0,
            current_pass: Vec::new(),
            pass_pos: 0,
        };
        it.start_pass();
        Ok(it)
    }

    /// Record the pre-shuffle RNG state, build a fresh pass, and reset the
    /// pass cursor. Shared by fresh construction, natural pass rollover, and
    /// restart-after-skip.
    fn start_pass(&mut self) {
        self.pass_start_rng = self.rng.clone();
        self.current_pass = self.original_items.clone();
        if self.shuffle {
            shuffle(&mut self.rng, &mut self.current_pass);
        }
        self.pass_pos = 0;
        self.items_consumed = 0;
    }

    /// Advance past `n` unsharded positions of the current pass without
    /// yielding, reshuffling into further passes as needed.
    fn skip_unsharded(&mut self, mut n: u64) {
        while n > 0 {
            let remaining = self.current_pass.len() as u64 - self.pass_pos as u64;
            if n < remaining {
                self.pass_pos += n as usize;
                self.items_consumed += n;
                return;
            }
            n -= remaining;
            self.start_pass();
        }
    }
}

impl<T: Clone> CheckpointableIterator for InfinitePermutation<T> {
    type Item = T;
    type State = PermutationState;

    fn next(&mut self) -> Option<T> {
        loop {
            if self.pass_pos >= self.current_pass.len() {
                self.start_pass();
            }
            let idx = self.pass_pos as u64;
            let item = self.current_pass[self.pass_pos].clone();
            self.pass_pos += 1;
            self.items_consumed += 1;
            if idx % self.num_instances == self.instance_rank {
                return Some(item);
            }
        }
    }

    fn get_state(&self) -> PermutationState {
        PermutationState {
            rng: self.pass_start_rng.clone(),
            items_consumed: self.items_consumed,
        }
    }

    fn set_state(&mut self, state: Option<PermutationState>) {
        match state {
            None => {
                self.rng = new_rng(self.seed.unwrap_or(0));
                self.start_pass();
            }
            Some(s) => {
                self.rng = s.rng;
                self.start_pass();
                self.skip_unsharded(s.items_consumed);
            }
        }
    }
}
