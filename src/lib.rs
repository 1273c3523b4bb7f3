//! dynqueue: a thread-safe FIFO queue with a bounded inbound port, an
//! unbounded internal buffer, and a one-slot outbound port.

pub mod core;
pub mod queue;

pub use queue::{DynamicQueue, QueueConfig, QueueError, QueueResult, ShutdownPolicy};
