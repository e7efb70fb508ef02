//! Transport port - The full-duplex connection the channel runs over.
//!
//! The channel never touches a socket directly. It asks a [`Transport`] to
//! open a connection and gets back a [`TransportLink`]: a handle for
//! outbound frames plus a stream of lifecycle and message events. Tests
//! swap in a scripted transport to drive the reconnection state machine.
//!
//! ## Event order
//!
//! ```text
//! Opened? -> (Message | Error)* -> Closed
//! ```
//!
//! A transport may emit `Error` without a following `Closed`; the channel
//! treats that as a close once its grace period runs out.

use thiserror::Error;
use tokio::sync::mpsc;

/// Lifecycle and data events produced by an open transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake completed; frames may flow.
    Opened,
    /// One inbound text frame.
    Message(String),
    /// Transport-level error. Not necessarily followed by `Closed`.
    Error(String),
    /// Connection ended from the remote side or the network.
    Closed { reason: Option<String> },
}

/// Errors raised by transport implementations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to start connection: {0}")]
    Connect(String),

    #[error("Failed to send frame: {0}")]
    Send(String),

    #[error("Connection is closed")]
    Closed,
}

/// Outbound half of an open connection.
pub trait TransportConnection: Send + Sync {
    /// Hands a serialized frame to the transport without blocking.
    fn send(&self, text: String) -> Result<(), TransportError>;

    /// Closes the connection. No `Closed` event is required afterwards.
    fn close(&self);
}

/// Result of opening a transport.
pub struct TransportLink {
    /// Outbound handle.
    pub connection: Box<dyn TransportConnection>,
    /// Inbound lifecycle and message events, in arrival order.
    pub events: mpsc::UnboundedReceiver<TransportEvent>,
}

impl std::fmt::Debug for TransportLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportLink").finish_non_exhaustive()
    }
}

/// Factory for transport connections.
///
/// `open` must not block: it validates its input, starts the handshake in the
/// background and returns immediately. Only construction failures (bad URL,
/// no runtime, refused synchronously) are returned as errors; everything that
/// happens later arrives as a [`TransportEvent`].
pub trait Transport: Send + Sync {
    fn open(&self, url: &str) -> Result<TransportLink, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that traits are object-safe
    #[allow(dead_code)]
    fn assert_transport_object_safe(_: &dyn Transport) {}

    #[allow(dead_code)]
    fn assert_connection_object_safe(_: &dyn TransportConnection) {}

    #[test]
    fn transport_error_messages_are_descriptive() {
        let err = TransportError::InvalidUrl {
            url: "http://x".to_string(),
            reason: "unsupported scheme".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid endpoint URL 'http://x': unsupported scheme"
        );
        assert_eq!(TransportError::Closed.to_string(), "Connection is closed");
    }
}
