//! Synchronized element-wise combination of upstreams. See spec §4.6.

use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointableIterator;

/// Homogeneous N-way zip: every upstream shares the same stage type and item
/// type. Ends as soon as any upstream ends.
pub struct Zip<Up: CheckpointableIterator> {
    upstreams: Vec<Up>,
}

impl<Up: CheckpointableIterator> Zip<Up> {
    pub fn new(upstreams: Vec<Up>) -> Self {
        Self { upstreams }
    }
}

impl<Up: CheckpointableIterator> CheckpointableIterator for Zip<Up> {
    type Item = Vec<Up::Item>;
    type State = Vec<Up::State>;

    fn next(&mut self) -> Option<Vec<Up::Item>> {
        let mut out = Vec::with_capacity(self.upstreams.len());
        for up in &mut self.upstreams {
            out.push(up.next()?);
        }
        Some(out)
    }

    fn get_state(&self) -> Self::State {
        self.upstreams.iter().map(|u| u.get_state()).collect()
    }

    fn set_state(&mut self, state: Option<Self::State>) {
        match state {
            None => {
                for up in &mut self.upstreams {
                    up.set_state(None);
                }
            }
            Some(states) => {
                for (up, s) in self.upstreams.iter_mut().zip(states) {
                    up.set_state(Some(s));
                }
            }
        }
    }
}

/// Convenience pair for the common case of zipping two differently-typed
/// upstreams, since Rust can't express a variadic tuple-returning `Zip`
/// generically without a macro.
pub struct Zip2<A: CheckpointableIterator, B: CheckpointableIterator> {
    a: A,
    b: B,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zip2State<SA, SB> {
    pub a: SA,
    pub b: SB,
}

impl<A: CheckpointableIterator, B: CheckpointableIterator> Zip2<A, B> {
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A: CheckpointableIterator, B: CheckpointableIterator> CheckpointableIterator for Zip2<A, B> {
    type Item = (A::Item, B::Item);
    type State = Zip2State<A::State, B::State>;

    fn next(&mut self) -> Option<(A::Item, B::Item)> {
        let a = self.a.next()?;
        let b = self.b.next()?;
        Some((a, b))
    }

    fn get_state(&self) -> Self::State {
        Zip2State {
            a: self.a.get_state(),
            b: self.b.get_state(),
        }
    }

    fn set_state(&mut self, state: Option<Self::State>) {
        match state {
            None => {
                self.a.set_state(None);
                self.b.set_state(None);
            }
            Some(s) => {
                self.a.set_state(Some(s.a));
                self.b.set_state(Some(s.b));
            }
        }
    }
}
