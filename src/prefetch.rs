//! Background-thread read-ahead to hide upstream I/O latency behind a
//! bounded queue. The only stage in the pipeline that is not purely
//! cooperative single-threaded. See spec §4.11, §5.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use serde::{Deserialize, Serialize};

use crate::checkpoint::CheckpointableIterator;
use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefetchState<S> {
    pub source_state: Option<S>,
    pub item_offset: u64,
}

enum Message<Item, State> {
    Item(Item, Option<State>),
    End,
}

pub struct Prefetch<Up>
where
    Up: CheckpointableIterator + Send + 'static,
    Up::Item: Send + 'static,
    Up::State: Send + 'static,
{
    capacity: usize,
    poll_interval: Duration,
    stop: Arc<AtomicBool>,
    sender: Sender<Message<Up::Item, Up::State>>,
    receiver: Receiver<Message<Up::Item, Up::State>>,
    thread: Option<JoinHandle<Up>>,

    source_state: Option<Up::State>,
    item_offset: u64,
}

impl<Up> Prefetch<Up>
where
    Up: CheckpointableIterator + Send + 'static,
    Up::Item: Send + 'static,
    Up::State: Send + 'static,
{
    pub fn new(mut upstream: Up, capacity: usize, poll_interval: Duration) -> Result<Self> {
        if capacity < 1 {
            return Err(PipelineError::Configuration(
                "Prefetch requires capacity >= 1".into(),
            ));
        }
        upstream.set_state(None);
        let (sender, receiver) = bounded(capacity);
        let stop = Arc::new(AtomicBool::new(false));
        let thread = Some(Self::spawn_producer(
            upstream,
            0,
            capacity,
            poll_interval,
            stop.clone(),
            sender.clone(),
        ));
        Ok(Self {
            capacity,
            poll_interval,
            stop,
            sender,
            receiver,
            thread,
            source_state: None,
            item_offset: 0,
        })
    }

    /// One producer thread per instance. Pulls from upstream and enqueues
    /// `(item, upstream_state_or_none)`; a fresh checkpoint rides along with
    /// every `capacity`-th item so the consumer can reconstruct a position
    /// without ever needing to peek inside the queue. `skip` replays past
    /// already-consumed items on restart without re-enqueuing them.
    fn spawn_producer(
        mut upstream: Up,
        skip: u64,
        capacity: usize,
        poll_interval: Duration,
        stop: Arc<AtomicBool>,
        sender: Sender<Message<Up::Item, Up::State>>,
    ) -> JoinHandle<Up> {
        std::thread::spawn(move || {
            let mut local_offset: usize = 0;
            for _ in 0..skip {
                if upstream.next().is_none() {
                    break;
                }
                local_offset += 1;
            }

            let mut pending: Option<Message<Up::Item, Up::State>> = None;
            while !stop.load(Ordering::Relaxed) {
                if pending.is_none() {
                    pending = Some(match upstream.next() {
                        Some(item) => {
                            let state = if local_offset == capacity - 1 {
                                Some(upstream.get_state())
                            } else {
                                None
                            };
                            local_offset = (local_offset + 1) % capacity;
                            Message::Item(item, state)
                        }
                        None => Message::End,
                    });
                }
                let msg = pending.take().unwrap();
                let is_end = matches!(msg, Message::End);
                match sender.send_timeout(msg, poll_interval) {
                    Ok(()) => {
                        if is_end {
                            break;
                        }
                    }
                    Err(SendTimeoutError::Timeout(msg)) => pending = Some(msg),
                    Err(SendTimeoutError::Disconnected(_)) => break,
                }
            }
            upstream
        })
    }

    /// Signal the producer, join it, and reclaim ownership of upstream.
    fn stop_and_reclaim(&mut self) -> Up {
        self.stop.store(true, Ordering::Relaxed);
        // Drain so the producer's blocked send_timeout can observe the stop
        // signal promptly instead of waiting out the full poll interval.
        while self.receiver.try_recv().is_ok() {}
        let handle = self.thread.take().expect("producer thread always present");
        handle.join().expect("producer thread panicked")
    }
}

impl<Up> CheckpointableIterator for Prefetch<Up>
where
    Up: CheckpointableIterator + Send + 'static,
    Up::Item: Send + 'static,
    Up::State: Send + 'static,
{
    type Item = Up::Item;
    type State = PrefetchState<Up::State>;

    fn next(&mut self) -> Option<Up::Item> {
        match self.receiver.recv() {
            Ok(Message::End) => None,
            Ok(Message::Item(item, state)) => {
                match state {
                    Some(s) => {
                        debug_assert_eq!(self.item_offset, self.capacity as u64 - 1);
                        self.source_state = Some(s);
                        self.item_offset = 0;
                    }
                    None => {
                        self.item_offset += 1;
                        debug_assert!(self.item_offset < self.capacity as u64);
                    }
                }
                Some(item)
            }
            Err(_) => None,
        }
    }

    fn get_state(&self) -> Self::State {
        PrefetchState {
            source_state: self.source_state.clone(),
            item_offset: self.item_offset,
        }
    }

    fn set_state(&mut self, state: Option<Self::State>) {
        let mut upstream = self.stop_and_reclaim();
        self.stop = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = bounded(self.capacity);
        self.sender = sender.clone();
        self.receiver = receiver;

        let skip = match state {
            None => {
                upstream.set_state(None);
                self.source_state = None;
                self.item_offset = 0;
                0
            }
            Some(s) => {
                upstream.set_state(s.source_state.clone());
                self.source_state = s.source_state;
                self.item_offset = s.item_offset;
                s.item_offset
            }
        };

        self.thread = Some(Self::spawn_producer(
            upstream,
            skip,
            self.capacity,
            self.poll_interval,
            self.stop.clone(),
            sender,
        ));
    }
}

impl<Up> Drop for Prefetch<Up>
where
    Up: CheckpointableIterator + Send + 'static,
    Up::Item: Send + 'static,
    Up::State: Send + 'static,
{
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(t) = self.thread.take() {
            while self.receiver.try_recv().is_ok() {}
            let _ = t.join();
        }
    }
}
