//! Inbound and outbound ports
//!
//! Both ports are thin handles over tokio mpsc channels that also watch the
//! queue's lifecycle token, so no send or receive can outlive `close()`.

use crate::queue::buffer::Buffer;
use crate::queue::error::{SendError, TryRecvError, TrySendError};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio_util::sync::CancellationToken;

/// Producer handle: bounded, blocks when full
///
/// Callers must stop producing once the queue is closed. Sends that race
/// with `close()` are rejected with the item handed back, never accepted
/// and lost, except for items already sitting on the port when a
/// [`ShutdownPolicy::Discard`](crate::queue::ShutdownPolicy::Discard) queue
/// closes.
pub struct InboundPort<T> {
    sender: mpsc::Sender<T>,
    lifecycle: CancellationToken,
}

impl<T> Clone for InboundPort<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            lifecycle: self.lifecycle.clone(),
        }
    }
}

impl<T> InboundPort<T> {
    pub(crate) fn new(sender: mpsc::Sender<T>, lifecycle: CancellationToken) -> Self {
        Self { sender, lifecycle }
    }

    /// Send an item, waiting for a free slot if the port is full
    pub async fn send(&self, item: T) -> Result<(), SendError<T>> {
        if self.lifecycle.is_cancelled() {
            return Err(SendError::Closed(item));
        }

        // Reserve first so the item is never moved into a dropped future
        let permit = tokio::select! {
            biased;
            _ = self.lifecycle.cancelled() => None,
            permit = self.sender.reserve() => permit.ok(),
        };

        match permit {
            Some(permit) => {
                permit.send(item);
                Ok(())
            }
            None => Err(SendError::Closed(item)),
        }
    }

    /// Send without waiting
    pub fn try_send(&self, item: T) -> Result<(), TrySendError<T>> {
        if self.lifecycle.is_cancelled() {
            return Err(TrySendError::Closed(item));
        }
        self.sender.try_send(item).map_err(|err| match err {
            mpsc::error::TrySendError::Full(item) => TrySendError::Full(item),
            mpsc::error::TrySendError::Closed(item) => TrySendError::Closed(item),
        })
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_cancelled() || self.sender.is_closed()
    }

    /// Fixed capacity of the port
    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }
}

/// Consumer handle: yields items in FIFO order until the queue closes
///
/// Clones share one receiver; each item goes to exactly one consumer.
pub struct OutboundPort<T> {
    receiver: Arc<AsyncMutex<mpsc::Receiver<T>>>,
    buffer: Arc<Buffer<T>>,
    lifecycle: CancellationToken,
}

impl<T> Clone for OutboundPort<T> {
    fn clone(&self) -> Self {
        Self {
            receiver: Arc::clone(&self.receiver),
            buffer: Arc::clone(&self.buffer),
            lifecycle: self.lifecycle.clone(),
        }
    }
}

impl<T> OutboundPort<T> {
    pub(crate) fn new(
        receiver: mpsc::Receiver<T>,
        buffer: Arc<Buffer<T>>,
        lifecycle: CancellationToken,
    ) -> Self {
        Self {
            receiver: Arc::new(AsyncMutex::new(receiver)),
            buffer,
            lifecycle,
        }
    }

    /// Receive the next item, or `None` once the queue is closed
    pub async fn recv(&self) -> Option<T> {
        if self.lifecycle.is_cancelled() {
            return None;
        }

        let item = tokio::select! {
            biased;
            _ = self.lifecycle.cancelled() => None,
            item = async { self.receiver.lock().await.recv().await } => item,
        };

        if item.is_some() {
            self.buffer.mark_received();
        }
        item
    }

    /// Receive without waiting
    ///
    /// Reports `Empty` while another consumer is blocked in `recv`.
    pub fn try_recv(&self) -> Result<T, TryRecvError> {
        if self.lifecycle.is_cancelled() {
            return Err(TryRecvError::Closed);
        }
        let mut receiver = self.receiver.try_lock().map_err(|_| TryRecvError::Empty)?;
        let item = receiver.try_recv().map_err(|err| match err {
            mpsc::error::TryRecvError::Empty => TryRecvError::Empty,
            mpsc::error::TryRecvError::Disconnected => TryRecvError::Closed,
        })?;
        self.buffer.mark_received();
        Ok(item)
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_cancelled()
    }

    /// Close the channel and collect whatever was still waiting on it
    ///
    /// Called by the queue after cancellation, once the outtake worker has
    /// stopped; pending `recv` calls have already returned by then.
    pub(crate) async fn close(&self) -> Vec<T> {
        let mut receiver = self.receiver.lock().await;
        receiver.close();

        let mut residue = Vec::new();
        while let Some(item) = receiver.recv().await {
            residue.push(item);
        }
        residue
    }
}
