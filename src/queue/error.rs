//! Queue Error Types

use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Invalid queue configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Failed to parse queue configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Error returned by [`InboundPort::send`](crate::queue::InboundPort::send)
///
/// The rejected item is handed back so the caller decides whether to drop it.
#[derive(PartialEq, Eq, Clone, Copy)]
pub enum SendError<T> {
    /// The queue was closed before the item was accepted
    Closed(T),
}

impl<T> SendError<T> {
    /// Recover the rejected item
    pub fn into_inner(self) -> T {
        match self {
            SendError::Closed(item) => item,
        }
    }
}

impl<T> fmt::Debug for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

impl<T> fmt::Display for SendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendError::Closed(_) => write!(f, "Sending on a closed queue"),
        }
    }
}

impl<T> std::error::Error for SendError<T> {}

/// Error returned by [`InboundPort::try_send`](crate::queue::InboundPort::try_send)
#[derive(PartialEq, Eq, Clone, Copy)]
pub enum TrySendError<T> {
    /// The inbound port is at capacity
    Full(T),
    /// The queue is closed
    Closed(T),
}

impl<T> TrySendError<T> {
    pub fn into_inner(self) -> T {
        match self {
            TrySendError::Full(item) | TrySendError::Closed(item) => item,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, TrySendError::Closed(_))
    }
}

impl<T> fmt::Debug for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrySendError::Full(_) => f.write_str("Full(..)"),
            TrySendError::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}

impl<T> fmt::Display for TrySendError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrySendError::Full(_) => write!(f, "Inbound port is full"),
            TrySendError::Closed(_) => write!(f, "Sending on a closed queue"),
        }
    }
}

impl<T> std::error::Error for TrySendError<T> {}

/// Error returned by [`OutboundPort::try_recv`](crate::queue::OutboundPort::try_recv)
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TryRecvError {
    /// Nothing is waiting on the outbound port right now
    #[error("Outbound port is empty")]
    Empty,

    /// The queue is closed; nothing further will be delivered
    #[error("Receiving on a closed queue")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_error_returns_item() {
        let err = SendError::Closed(String::from("payload"));
        assert_eq!(err.to_string(), "Sending on a closed queue");
        assert_eq!(format!("{:?}", err), "Closed(..)");
        assert_eq!(err.into_inner(), "payload");
    }

    #[test]
    fn test_try_send_error_variants() {
        let full = TrySendError::Full(1);
        let closed = TrySendError::Closed(2);

        assert!(!full.is_closed());
        assert!(closed.is_closed());
        assert_eq!(full.to_string(), "Inbound port is full");
        assert_eq!(full.into_inner(), 1);
        assert_eq!(closed.into_inner(), 2);
    }

    #[test]
    fn test_invalid_config_message() {
        let err = QueueError::InvalidConfig {
            message: "inbound_capacity must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid queue configuration: inbound_capacity must be at least 1"
        );
    }
}
