//! Projects each upstream item to a finite sequence and flattens. §4.2.

use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointableIterator;

/// `Up::State` is nested as-is: the composite checkpoint of a pipeline is
/// structurally the checkpoint of its tail, recursively embedding its
/// upstream's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectManyState<S> {
    /// Upstream state as it stood immediately *before* the `next()` that
    /// produced the currently in-flight source item. Restoring to this state
    /// and pulling once reproduces the same source item, so its expansion
    /// can be regenerated deterministically.
    pub upstream_state: Option<S>,
    pub items_emitted: u64,
}

pub struct SelectMany<Up, V, F>
where
    Up: CheckpointableIterator,
    F: FnMut(&Up::Item) -> Vec<V>,
{
    upstream: Up,
    expand: F,

    upstream_state: Option<Up::State>,
    current: std::vec::IntoIter<V>,
    items_emitted: u64,
    exhausted: bool,
}

impl<Up, V, F> SelectMany<Up, V, F>
where
    Up: CheckpointableIterator,
    F: FnMut(&Up::Item) -> Vec<V>,
{
    pub fn new(mut upstream: Up, expand: F) -> Self {
        upstream.set_state(None);
        Self {
            upstream,
            expand,
            upstream_state: None,
            current: Vec::new().into_iter(),
            items_emitted: 0,
            exhausted: false,
        }
    }

    /// Pull the next source item and (re-)expand it into `current`. Returns
    /// `false` once upstream is exhausted.
    ///
    /// The upstream state is snapshotted *before* the pull, not after: that
    /// snapshot is exactly the position from which re-pulling reproduces the
    /// same source item on restart.
    fn refill(&mut self) -> bool {
        self.upstream_state = Some(self.upstream.get_state());
        match self.upstream.next() {
            Some(source_item) => {
                self.current = (self.expand)(&source_item).into_iter();
                self.items_emitted = 0;
                true
            }
            None => {
                self.exhausted = true;
                false
            }
        }
    }
}

impl<Up, V, F> CheckpointableIterator for SelectMany<Up, V, F>
where
    Up: CheckpointableIterator,
    F: FnMut(&Up::Item) -> Vec<V>,
{
    type Item = V;
    type State = SelectManyState<Up::State>;

    fn next(&mut self) -> Option<V> {
        loop {
            if let Some(item) = self.current.next() {
                self.items_emitted += 1;
                return Some(item);
            }
            if self.exhausted || !self.refill() {
                return None;
            }
        }
    }

    fn get_state(&self) -> Self::State {
        SelectManyState {
            upstream_state: self.upstream_state.clone(),
            items_emitted: self.items_emitted,
        }
    }

    fn set_state(&mut self, state: Option<Self::State>) {
        match state {
            None => {
                self.upstream.set_state(None);
                self.upstream_state = None;
                self.current = Vec::new().into_iter();
                self.items_emitted = 0;
                self.exhausted = false;
            }
            Some(s) => {
                self.upstream.set_state(s.upstream_state.clone());
                self.upstream_state = s.upstream_state;
                self.exhausted = false;
                // Re-produce the in-flight source item by pulling once more
                // from upstream at its restored position, re-expand it, and
                // skip the already-emitted prefix.
                match self.upstream.next() {
                    Some(source_item) => {
                        // upstream_state is already the pre-pull snapshot
                        // (s.upstream_state); leave it as-is.
                        let mut items = (self.expand)(&source_item);
                        let skip = (s.items_emitted as usize).min(items.len());
                        self.current = items.split_off(skip).into_iter();
                        self.items_emitted = skip as u64;
                    }
                    None => {
                        self.current = Vec::new().into_iter();
                        self.items_emitted = 0;
                        self.exhausted = true;
                    }
                }
            }
        }
    }
}
