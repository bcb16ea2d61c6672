//! Error types for transport operations

use super::ConnectionId;

/// Error type for transport operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// Operation needs an open transport
    #[error("transport is not open")]
    NotOpen,
    /// Connection handle is not (or no longer) known to the backend
    #[error("unknown connection {0}")]
    UnknownConnection(ConnectionId),
    /// Backend-specific failure
    #[error("transport backend error: {0}")]
    Backend(String),
}
