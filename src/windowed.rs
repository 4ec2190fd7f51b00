//! Sliding fixed-width window over upstream. See spec §4.7.
//!
//! Ported directly from the source's double-buffered-FIFO generator: the
//! FIFO holds up to `2*width` items; each "half" advance snapshots the
//! upstream state *before* extending, serves every window start offset in
//! `[0, last]`, then drops the served prefix. The checkpoint-visible state
//! (`s0`) is only committed once an entire half has finished serving —
//! mid-half, `get_state` still reports the *previous* half's snapshot, which
//! is exactly what lets a restart regenerate the current half byte-for-byte.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointableIterator;
use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowedState<S> {
    pub s0: Option<S>,
    pub item_offset: u64,
}

pub struct Windowed<Up>
where
    Up: CheckpointableIterator,
    Up::Item: Clone,
{
    upstream: Up,
    width: usize,

    fifo: VecDeque<Up::Item>,
    /// Checkpoint-visible snapshot, committed only at half boundaries.
    s0: Option<Up::State>,
    /// Snapshot taken before the in-progress half's extension, pending
    /// commit into `s0` once that half finishes serving.
    next_s0: Option<Up::State>,
    item_offset: u64,
    /// Inclusive upper bound on serveable offsets for the current half;
    /// `None` once upstream can no longer fill a full `width`-sized half.
    last: Option<usize>,
}

impl<Up> Windowed<Up>
where
    Up: CheckpointableIterator,
    Up::Item: Clone,
{
    pub fn new(mut upstream: Up, width: usize) -> Result<Self> {
        if width < 1 {
            return Err(PipelineError::Configuration(
                "Windowed requires width >= 1".into(),
            ));
        }
        upstream.set_state(None);
        let mut w = Self {
            upstream,
            width,
            fifo: VecDeque::new(),
            s0: None,
            next_s0: None,
            item_offset: 0,
            last: None,
        };
        w.initial_fill();
        Ok(w)
    }

    fn window_at(&self, offset: usize) -> Vec<Up::Item> {
        self.fifo.iter().skip(offset).take(self.width).cloned().collect()
    }

    /// Snapshot upstream state, then fill the FIFO with up to `width` items.
    fn initial_fill(&mut self) {
        self.s0 = Some(self.upstream.get_state());
        self.fifo.clear();
        self.fill_up_to_width();
        if self.fifo.len() == self.width {
            self.prepare_half();
        } else {
            self.last = None;
        }
    }

    fn fill_up_to_width(&mut self) {
        while self.fifo.len() < self.width {
            match self.upstream.next() {
                Some(item) => self.fifo.push_back(item),
                None => break,
            }
        }
    }

    /// Snapshot the pending `next_s0`, extend the FIFO by another `width`,
    /// and compute `last` for the half that is now ready to serve.
    fn prepare_half(&mut self) {
        self.next_s0 = Some(self.upstream.get_state());
        let before = self.fifo.len();
        while self.fifo.len() < before + self.width {
            match self.upstream.next() {
                Some(item) => self.fifo.push_back(item),
                None => break,
            }
        }
        self.last = Some((self.width - 1).min(self.fifo.len() - self.width));
        self.item_offset = 0;
    }
}

impl<Up> CheckpointableIterator for Windowed<Up>
where
    Up: CheckpointableIterator,
    Up::Item: Clone,
{
    type Item = Vec<Up::Item>;
    type State = WindowedState<Up::State>;

    fn next(&mut self) -> Option<Vec<Up::Item>> {
        loop {
            let last = self.last?;
            if self.item_offset as usize <= last {
                let window = self.window_at(self.item_offset as usize);
                self.item_offset += 1;
                return Some(window);
            }
            // Current half fully served: commit its pending snapshot, drop
            // the served prefix, and try to prepare the next half.
            self.s0 = self.next_s0.take();
            for _ in 0..=last {
                self.fifo.pop_front();
            }
            if self.fifo.len() == self.width {
                self.prepare_half();
            } else {
                self.last = None;
            }
        }
    }

    fn get_state(&self) -> Self::State {
        WindowedState {
            s0: self.s0.clone(),
            item_offset: self.item_offset,
        }
    }

    fn set_state(&mut self, state: Option<Self::State>) {
        match state {
            None => {
                self.upstream.set_state(None);
                self.initial_fill();
            }
            Some(s) => {
                self.upstream.set_state(s.s0.clone());
                self.s0 = s.s0;
                self.fifo.clear();
                self.fill_up_to_width();
                if self.fifo.len() == self.width {
                    self.prepare_half();
                    self.item_offset = s.item_offset;
                } else {
                    self.last = None;
                }
            }
        }
    }
}
