//! A two-way sum type over stages that share an item type but diverge in
//! concrete shape — the one place in the crate where composition isn't by a
//! single fixed generic chain, because the canonical dataset composition
//! branches on runtime config (`shuffle`, `transform`) while still needing a
//! concrete, non-erased `State` to checkpoint. `EitherState` carries that
//! distinction into the checkpoint itself rather than boxing it away.

use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointableIterator;

pub enum Either<L, R> {
    Left(L),
    Right(R),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EitherState<SL, SR> {
    Left(SL),
    Right(SR),
}

impl<L, R> CheckpointableIterator for Either<L, R>
where
    L: CheckpointableIterator,
    R: CheckpointableIterator<Item = L::Item>,
{
    type Item = L::Item;
    type State = EitherState<L::State, R::State>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Either::Left(l) => l.next(),
            Either::Right(r) => r.next(),
        }
    }

    fn get_state(&self) -> Self::State {
        match self {
            Either::Left(l) => EitherState::Left(l.get_state()),
            Either::Right(r) => EitherState::Right(r.get_state()),
        }
    }

    fn set_state(&mut self, state: Option<Self::State>) {
        match (self, state) {
            (Either::Left(l), None) => l.set_state(None),
            (Either::Right(r), None) => r.set_state(None),
            (Either::Left(l), Some(EitherState::Left(s))) => l.set_state(Some(s)),
            (Either::Right(r), Some(EitherState::Right(s))) => r.set_state(Some(s)),
            (Either::Left(_), Some(EitherState::Right(_)))
            | (Either::Right(_), Some(EitherState::Left(_))) => {
                panic!("checkpoint branch does not match pipeline configuration")
            }
        }
    }
}
