//! Public API for the queue system
//!
//! External modules should import from here rather than directly from internal modules.
//! See module documentation for complete usage examples and architecture details.

// Queue handle and ports
pub use crate::queue::dynamic::DynamicQueue;
pub use crate::queue::ports::{InboundPort, OutboundPort};

// Configuration
pub use crate::queue::config::{QueueConfig, ShutdownPolicy};

// Error handling
pub use crate::queue::error::{QueueError, QueueResult, SendError, TryRecvError, TrySendError};

// Lifecycle tokens used to construct and observe queues
pub use tokio_util::sync::CancellationToken;
