//! Dynamically-growable FIFO Queue
//!
//! A thread-safe FIFO queue with a bounded inbound port for producers, an
//! unbounded internal buffer, and a one-slot outbound port for consumers.
//! Producers only wait while the inbound port is full; any backlog is absorbed
//! by the buffer.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐ send  ┌──────────────┐        ┌──────────┐
//! │ Producer ├──────►│ InboundPort  │        │  Buffer  │
//! └──────────┘       │ (20 slots)   ├───────►│ (VecDeque│
//! ┌──────────┐ send  │              │ intake │  + Mutex)│
//! │ Producer ├──────►│              │ worker │          │
//! └──────────┘       └──────────────┘        └────┬─────┘
//!                                                 │ outtake worker
//! ┌──────────┐ recv  ┌──────────────┐             │
//! │ Consumer │◄──────┤ OutboundPort │◄────────────┘
//! └──────────┘       │ (1 slot)     │
//!                    └──────────────┘
//!          both workers watch the queue's CancellationToken
//! ```
//!
//! # Lifecycle
//!
//! A queue is created open with both workers running and closes exactly
//! once, either through [`DynamicQueue::close`] or when the parent token is
//! cancelled. Closing cancels the token, waits for the workers, closes both
//! ports, and clears the buffer. Further sends are rejected with the item
//! handed back; receives return `None`.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use dynqueue::queue::{DynamicQueue, QueueConfig, ShutdownPolicy};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let root = CancellationToken::new();
//! let config = QueueConfig::new("work").with_shutdown_policy(ShutdownPolicy::Drain);
//! let queue = DynamicQueue::with_config(&root, config)?;
//!
//! queue.send("job-1".to_string()).await?;
//! queue.send("job-2".to_string()).await?;
//!
//! let outbound = queue.outbound();
//! tokio::select! {
//!     job = outbound.recv() => println!("got {:?}", job),
//!     _ = queue.done() => println!("queue closed"),
//! }
//!
//! let leftovers = queue.close().await;
//! println!("{} job(s) were never delivered", leftovers.len());
//! # Ok(())
//! # }
//! ```

mod buffer;
mod config;
mod dynamic;
mod error;
mod ports;
mod workers;

pub mod api;

pub use config::{QueueConfig, ShutdownPolicy, DEFAULT_INBOUND_CAPACITY, OUTBOUND_CAPACITY};
pub use dynamic::DynamicQueue;
pub use error::{QueueError, QueueResult, SendError, TryRecvError, TrySendError};
pub use ports::{InboundPort, OutboundPort};

#[cfg(test)]
mod tests;
