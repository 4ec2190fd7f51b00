//! Reads ahead a fixed window of items, sorts by length to bucket similar
//! sizes together, groups into batches, and optionally shuffles the batch
//! order. Grouping is by length only — the sort is stable, so it doesn't
//! undo earlier randomization. See spec §4.10.

use rand_chacha::ChaCha8Rng;

use crate::checkpoint::CheckpointableIterator;
use crate::rng::new_rng;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BucketedBatchState<S> {
    pub input_state: Option<S>,
    pub random_state: Option<ChaCha8Rng>,
    pub num_served: u64,
}

pub enum BatchSize<Item> {
    Fixed(usize),
    Dynamic(Box<dyn FnMut(&Item) -> usize>),
}

impl<Item> BatchSize<Item> {
    fn size_for(&mut self, item: &Item) -> usize {
        match self {
            BatchSize::Fixed(n) => *n,
            BatchSize::Dynamic(f) => f(item),
        }
    }
}

pub struct BucketedReadaheadBatch<Up, K, KeyFn>
where
    Up: CheckpointableIterator,
    KeyFn: FnMut(&Up::Item) -> K,
    K: Ord,
{
    upstream: Up,
    read_ahead: usize,
    key: KeyFn,
    batch_size: BatchSize<Up::Item>,
    seed: Option<u64>,
    rng: Option<ChaCha8Rng>,

    input_state: Option<Up::State>,
    random_state: Option<ChaCha8Rng>,
    batches: std::vec::IntoIter<Vec<Up::Item>>,
    num_served: u64,
    source_exhausted: bool,
}

impl<Up, K, KeyFn> BucketedReadaheadBatch<Up, K, KeyFn>
where
    Up: CheckpointableIterator,
    KeyFn: FnMut(&Up::Item) -> K,
    K: Ord,
{
    pub fn new(
        upstream: Up,
        read_ahead: usize,
        key: KeyFn,
        batch_size: BatchSize<Up::Item>,
        shuffle: bool,
        seed: Option<u64>,
    ) -> Self {
        let mut b = Self {
            upstream,
            read_ahead,
            key,
            batch_size,
            seed,
            rng: if shuffle { Some(new_rng(seed.unwrap_or(0))) } else { None },
            input_state: None,
            random_state: None,
            batches: Vec::new().into_iter(),
            num_served: 0,
            source_exhausted: false,
        };
        b.fill_section(0);
        b
    }

    /// Prefetch `read_ahead` items, bucket-sort them by `key` (longest
    /// first, stable), group into batches, shuffle the batch order, and
    /// re-skip `skip` batches already served in this section (used only
    /// right after a `set_state` restore; zero otherwise).
    fn fill_section(&mut self, skip: u64) {
        self.input_state = Some(self.upstream.get_state());
        self.random_state = self.rng.clone();

        let mut items = Vec::with_capacity(self.read_ahead);
        for _ in 0..self.read_ahead {
            match self.upstream.next() {
                Some(item) => items.push(item),
                None => break,
            }
        }
        self.source_exhausted = items.len() < self.read_ahead;

        let key = &mut self.key;
        items.sort_by(|a, b| key(b).cmp(&key(a)));

        let mut batches: Vec<Vec<Up::Item>> = Vec::new();
        let mut current: Vec<Up::Item> = Vec::new();
        let mut current_target = 0usize;
        for item in items {
            if current.is_empty() {
                current_target = self.batch_size.size_for(&item);
            }
            current.push(item);
            if current.len() >= current_target {
                batches.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            batches.push(current);
        }

        if let Some(rng) = self.rng.as_mut() {
            crate::rng::shuffle(rng, &mut batches);
        }

        let mut iter = batches.into_iter();
        let mut advanced = 0u64;
        for _ in 0..skip {
            if iter.next().is_none() {
                break;
            }
            advanced += 1;
        }
        self.num_served = advanced;
        self.batches = iter;
    }
}

impl<Up, K, KeyFn> CheckpointableIterator for BucketedReadaheadBatch<Up, K, KeyFn>
where
    Up: CheckpointableIterator,
    KeyFn: FnMut(&Up::Item) -> K,
    K: Ord,
{
    type Item = Vec<Up::Item>;
    type State = BucketedBatchState<Up::State>;

    fn next(&mut self) -> Option<Vec<Up::Item>> {
        loop {
            if let Some(batch) = self.batches.next() {
                self.num_served += 1;
                return Some(batch);
            }
            if self.source_exhausted {
                return None;
            }
            self.fill_section(0);
        }
    }

    fn get_state(&self) -> Self::State {
        BucketedBatchState {
            input_state: self.input_state.clone(),
            random_state: self.random_state.clone(),
            num_served: self.num_served,
        }
    }

    fn set_state(&mut self, state: Option<Self::State>) {
        match state {
            None => {
                self.upstream.set_state(None);
                self.rng = self.rng.as_ref().map(|_| new_rng(self.seed.unwrap_or(0)));
                self.fill_section(0);
            }
            Some(s) => {
                self.upstream.set_state(s.input_state);
                if self.rng.is_some() {
                    self.rng = s.random_state;
                }
                self.fill_section(s.num_served);
            }
        }
    }
}
