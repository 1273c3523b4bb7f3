//! Unbounded FIFO buffer shared by the intake and outtake workers
//!
//! The buffer owns every queued item. Items plus the two delivery counters
//! live behind one mutex, so `size()` always sees a consistent snapshot:
//!
//! - `in_flight`: removed from the buffer, waiting for an outbound slot
//! - `outbound_pending`: placed on the outbound port, not yet received
//!
//! An item is counted in exactly one of `items`, `in_flight` or
//! `outbound_pending` from the moment it is appended until a consumer
//! receives it. The buffer knows nothing about ports; callers pass closures
//! for the hand-off step.

use crate::core::sync::lock_or_recover;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::Notify;

#[derive(Debug)]
struct BufferState<T> {
    items: VecDeque<T>,
    in_flight: usize,
    outbound_pending: usize,
}

/// Mutex-guarded unbounded FIFO with event-driven removal
#[derive(Debug)]
pub(crate) struct Buffer<T> {
    state: Mutex<BufferState<T>>,
    /// Signalled on every append; wakes a waiting `take_for_delivery`
    available: Notify,
}

impl<T> Default for Buffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Buffer<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(BufferState {
                items: VecDeque::new(),
                in_flight: 0,
                outbound_pending: 0,
            }),
            available: Notify::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BufferState<T>> {
        lock_or_recover(&self.state, "queue buffer")
    }

    /// Append an item at the tail
    pub(crate) fn append(&self, item: T) {
        self.lock().items.push_back(item);
        self.available.notify_one();
    }

    /// Remove and return the head item, or `None` when empty
    ///
    /// Empty is an ordinary outcome, not a fault.
    #[allow(dead_code)]
    pub(crate) fn remove_head(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Items buffered, in flight, or waiting on the outbound port
    pub(crate) fn size(&self) -> usize {
        let state = self.lock();
        state.items.len() + state.outbound_pending + state.in_flight
    }

    /// Items currently held in the buffer itself
    #[allow(dead_code)]
    pub(crate) fn buffered(&self) -> usize {
        self.lock().items.len()
    }

    /// Empty the buffer and reset the delivery counters
    ///
    /// Returns the removed items in FIFO order. Only valid once the workers
    /// have stopped.
    pub(crate) fn clear(&self) -> Vec<T> {
        let mut state = self.lock();
        state.in_flight = 0;
        state.outbound_pending = 0;
        state.items.drain(..).collect()
    }

    /// Wait for the head item and mark it in flight
    ///
    /// Cancel safe: the item is removed in the same poll that returns it.
    pub(crate) async fn take_for_delivery(&self) -> T {
        loop {
            {
                let mut state = self.lock();
                if let Some(item) = state.items.pop_front() {
                    state.in_flight += 1;
                    return item;
                }
            }
            // notify_one keeps a permit when nobody waits, so an append
            // between the unlock above and this await is not missed
            self.available.notified().await;
        }
    }

    /// Deliver an in-flight item and move it to the outbound count
    ///
    /// `deliver` runs under the buffer lock and must not block.
    pub(crate) fn hand_off<F>(&self, item: T, deliver: F)
    where
        F: FnOnce(T),
    {
        let mut state = self.lock();
        deliver(item);
        state.in_flight = state.in_flight.saturating_sub(1);
        state.outbound_pending += 1;
    }

    /// Return an in-flight item to the head after an interrupted hand-off
    pub(crate) fn restore_head(&self, item: T) {
        let mut state = self.lock();
        state.items.push_front(item);
        state.in_flight = state.in_flight.saturating_sub(1);
    }

    /// Record that a consumer took an item off the outbound port
    pub(crate) fn mark_received(&self) {
        let mut state = self.lock();
        state.outbound_pending = state.outbound_pending.saturating_sub(1);
    }
}
