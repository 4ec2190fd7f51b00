//! Stateless pointwise transform. See spec §4.5.

use crate::checkpoint::CheckpointableIterator;

pub struct Map<Up, V, F>
where
    Up: CheckpointableIterator,
    F: FnMut(Up::Item) -> V,
{
    upstream: Up,
    transform: F,
}

impl<Up, V, F> Map<Up, V, F>
where
    Up: CheckpointableIterator,
    F: FnMut(Up::Item) -> V,
{
    pub fn new(upstream: Up, transform: F) -> Self {
        Self { upstream, transform }
    }
}

impl<Up, V, F> CheckpointableIterator for Map<Up, V, F>
where
    Up: CheckpointableIterator,
    F: FnMut(Up::Item) -> V,
{
    type Item = V;
    type State = Up::State;

    fn next(&mut self) -> Option<V> {
        self.upstream.next().map(&mut self.transform)
    }

    fn get_state(&self) -> Self::State {
        self.upstream.get_state()
    }

    fn set_state(&mut self, state: Option<Self::State>) {
        self.upstream.set_state(state)
    }
}
