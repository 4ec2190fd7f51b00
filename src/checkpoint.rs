use serde::de::DeserializeOwned;
use serde::Serialize;

/// The stateful producer of a (potentially infinite) sequence of items.
///
/// The three operations are the entire contract: `next` advances one step,
/// `get_state` captures an opaque token from which a freshly constructed
/// iterator of the same configuration reproduces the exact suffix, and
/// `set_state` restores that position.
///
/// Each stage declares its own concrete `State`, which nests its upstream's
/// `State` the way the pipeline itself nests stages — composition by value,
/// not by an erased enum. This mirrors how `std::iter`'s adapters
/// (`Map<I, F>`, `Zip<A, B>`, ...) compose by generic parameter rather than
/// trait objects; the difference here is that the associated `State` type
/// is what gets serialized, not the iterator itself.
pub trait CheckpointableIterator {
    type Item;
    type State: Clone + std::fmt::Debug + Serialize + DeserializeOwned;

    fn next(&mut self) -> Option<Self::Item>;

    fn get_state(&self) -> Self::State;

    fn set_state(&mut self, state: Option<Self::State>);
}

/// Adapts any `CheckpointableIterator` to the standard `Iterator` trait for
/// non-checkpointed consumption (tests, `.take(n)`, composition with the
/// standard library's adapters). This is the Rust analogue of Python's
/// `CheckpointableIterator.__iter__` returning `self`.
pub struct StdIter<I>(pub I);

impl<I: CheckpointableIterator> Iterator for StdIter<I> {
    type Item = I::Item;
    fn next(&mut self) -> Option<Self::Item> {
        CheckpointableIterator::next(&mut self.0)
    }
}

impl<I: CheckpointableIterator> From<I> for StdIter<I> {
    fn from(it: I) -> Self {
        StdIter(it)
    }
}
