//! DynamicQueue - the public queue handle
//!
//! Owns the lifecycle token and the worker handles, and implements the
//! shutdown order: cancel, join workers, close ports, clear the buffer.

use crate::queue::buffer::Buffer;
use crate::queue::config::{QueueConfig, OUTBOUND_CAPACITY};
use crate::queue::error::{QueueResult, SendError};
use crate::queue::ports::{InboundPort, OutboundPort};
use crate::queue::workers::{run_intake, run_outtake};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Teardown progress, held locked for the whole of `close()`
///
/// A handle is only cleared once it has been joined, so a `close()` future
/// dropped mid-join leaves the rest of the work to the next caller.
struct Teardown {
    intake: Option<JoinHandle<()>>,
    outtake: Option<JoinHandle<()>>,
    finished: bool,
}

/// Unbounded FIFO queue fed through a bounded inbound port and drained
/// through a one-slot outbound port
///
/// Producers block only while the inbound port is full; the internal buffer
/// absorbs any backlog behind it. Consumers receive items in the order the
/// intake worker accepted them.
///
/// # Example
///
/// ```rust,no_run
/// use dynqueue::queue::DynamicQueue;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() {
/// let root = CancellationToken::new();
/// let queue = DynamicQueue::new(&root);
///
/// let inbound = queue.inbound();
/// tokio::spawn(async move {
///     for i in 0..10 {
///         if inbound.send(i).await.is_err() {
///             break;
///         }
///     }
/// });
///
/// let outbound = queue.outbound();
/// while let Some(i) = outbound.recv().await {
///     println!("{}", i);
///     if i == 9 {
///         queue.close().await;
///     }
/// }
/// # }
/// ```
pub struct DynamicQueue<T> {
    config: QueueConfig,
    buffer: Arc<Buffer<T>>,
    inbound: InboundPort<T>,
    outbound: OutboundPort<T>,
    lifecycle: CancellationToken,
    teardown: AsyncMutex<Teardown>,
}

impl<T: Send + 'static> DynamicQueue<T> {
    /// Create a queue with the default configuration and start its workers
    ///
    /// The queue's lifecycle is a child of `parent`: cancelling `parent`
    /// closes the queue. Must be called from within a tokio runtime.
    pub fn new(parent: &CancellationToken) -> Self {
        Self::start(parent, QueueConfig::default())
    }

    /// Create a queue from a validated configuration and start its workers
    pub fn with_config(parent: &CancellationToken, config: QueueConfig) -> QueueResult<Self> {
        config.validate()?;
        Ok(Self::start(parent, config))
    }

    fn start(parent: &CancellationToken, config: QueueConfig) -> Self {
        let lifecycle = parent.child_token();
        let buffer = Arc::new(Buffer::new());
        let (inbound_tx, inbound_rx) = mpsc::channel(config.inbound_capacity);
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_CAPACITY);

        let intake = tokio::spawn(run_intake(
            config.name.clone(),
            inbound_rx,
            Arc::clone(&buffer),
            lifecycle.clone(),
            config.shutdown,
        ));
        let outtake = tokio::spawn(run_outtake(
            config.name.clone(),
            outbound_tx,
            Arc::clone(&buffer),
            lifecycle.clone(),
        ));

        log::debug!(
            "Queue '{}' opened (inbound capacity {}, shutdown policy {:?})",
            config.name,
            config.inbound_capacity,
            config.shutdown
        );

        Self {
            inbound: InboundPort::new(inbound_tx, lifecycle.clone()),
            outbound: OutboundPort::new(outbound_rx, Arc::clone(&buffer), lifecycle.clone()),
            buffer,
            lifecycle,
            teardown: AsyncMutex::new(Teardown {
                intake: Some(intake),
                outtake: Some(outtake),
                finished: false,
            }),
            config,
        }
    }

    /// Shut the queue down and return every item that was not delivered
    ///
    /// Idempotent: later calls return an empty vector, and concurrent calls
    /// wait until the first one has finished tearing down. Returned items are
    /// the outbound residue followed by the buffer in FIFO order. With
    /// [`ShutdownPolicy::Discard`](crate::queue::ShutdownPolicy::Discard)
    /// items still waiting on the inbound port are dropped.
    ///
    /// Cancel-safe: if the future is dropped before completing, the next call
    /// picks up the remaining steps.
    pub async fn close(&self) -> Vec<T> {
        self.lifecycle.cancel();

        let mut guard = self.teardown.lock().await;
        let teardown = &mut *guard;
        if teardown.finished {
            return Vec::new();
        }

        for (role, slot) in [("intake", &mut teardown.intake), ("outtake", &mut teardown.outtake)] {
            if let Some(handle) = slot.as_mut() {
                let joined = handle.await;
                *slot = None;
                if let Err(e) = joined {
                    log::error!("Queue '{}': {} worker failed: {}", self.config.name, role, e);
                }
            }
        }

        // The workers are gone, so the outbound channel has no senders left:
        // once its lock is held, draining it never pends
        let mut undelivered = self.outbound.close().await;
        undelivered.extend(self.buffer.clear());
        teardown.finished = true;

        if undelivered.is_empty() {
            log::info!("Queue '{}' closed", self.config.name);
        } else {
            log::info!(
                "Queue '{}' closed with {} undelivered item(s)",
                self.config.name,
                undelivered.len()
            );
        }
        undelivered
    }
}

impl<T> DynamicQueue<T> {
    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Producer handle for this queue
    pub fn inbound(&self) -> InboundPort<T> {
        self.inbound.clone()
    }

    /// Consumer handle for this queue
    pub fn outbound(&self) -> OutboundPort<T> {
        self.outbound.clone()
    }

    /// Shorthand for `inbound().send(item)`
    pub async fn send(&self, item: T) -> Result<(), SendError<T>> {
        self.inbound.send(item).await
    }

    /// Shorthand for `outbound().recv()`
    pub async fn recv(&self) -> Option<T> {
        self.outbound.recv().await
    }

    /// Snapshot of items not yet received by a consumer
    ///
    /// Counts buffered items, the item waiting for an outbound slot, and
    /// items sitting on the outbound port. Items still on the inbound port
    /// are not counted.
    pub fn size(&self) -> usize {
        self.buffer.size()
    }

    pub fn is_closed(&self) -> bool {
        self.lifecycle.is_cancelled()
    }

    /// Resolves once the queue's lifecycle token is cancelled
    pub async fn done(&self) {
        self.lifecycle.cancelled().await
    }

    /// Clone of the queue's lifecycle token
    pub fn lifecycle(&self) -> CancellationToken {
        self.lifecycle.clone()
    }
}

impl<T> Drop for DynamicQueue<T> {
    fn drop(&mut self) {
        // Workers hold their own references and exit on cancellation
        self.lifecycle.cancel();
    }
}
