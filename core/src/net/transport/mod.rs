//! Transport adapter for the co-op link
//!
//! The co-op core does not implement networking. A [`Transport`] backend
//! (WebRTC data channel, relay socket, ...) yields a session identity when it
//! opens and then reports connection, data and close events. Those events may
//! fire on any thread: backends push them into an [`EventSender`] and the
//! [`TransportAdapter`] drains the single-consumer inbox once per tick.
//!
//! ```text
//!  backend thread(s)              tick loop
//!  ─────────────────              ─────────
//!  Transport ──TransportEvent──▶ inbox ──▶ TransportAdapter::poll()
//! ```
//!
//! [`LoopbackNetwork`] is an in-process backend for tests and local demos.

mod adapter;
mod error;
mod loopback;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::mpsc;

use ghostlink_shared::SessionId;

pub use adapter::{AdapterEvent, ReadyAction, TransportAdapter};
pub use error::TransportError;
pub use loopback::{LoopbackNetwork, LoopbackTransport};

/// Backend-assigned handle for one logical link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raw events reported by a transport backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Transport is up and has assigned our identity
    Ready(SessionId),
    /// A peer connected to us unsolicited
    Incoming(ConnectionId),
    /// A connection can carry data
    Opened(ConnectionId),
    /// Payload received on a connection
    Data(ConnectionId, Vec<u8>),
    /// A connection closed (either side)
    Closed(ConnectionId),
}

/// Sending half of the adapter's inbox. Cheap to clone and `Send`.
#[derive(Debug, Clone)]
pub struct EventSender(mpsc::Sender<TransportEvent>);

impl EventSender {
    /// Create a sender and the receiver it feeds
    pub fn channel() -> (Self, mpsc::Receiver<TransportEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self(tx), rx)
    }

    /// Queue an event for the next tick. Dropped if the adapter is gone.
    pub fn send(&self, event: TransportEvent) {
        let _ = self.0.send(event);
    }
}

/// Point-to-point transport backend
///
/// Sends are fire-and-forget: no acknowledgement, no delivery guarantee.
/// A connection that can't be established reports nothing; it simply never
/// opens.
pub trait Transport {
    /// Start the backend. It reports [`TransportEvent::Ready`] once it has an
    /// identity, and every later event, through `events`.
    fn open(&mut self, events: EventSender) -> Result<(), TransportError>;

    /// Begin an outbound connection to `remote`
    fn connect(&mut self, remote: &SessionId) -> Result<ConnectionId, TransportError>;

    /// Send one payload on `conn`
    fn send(&mut self, conn: ConnectionId, payload: &[u8]) -> Result<(), TransportError>;

    /// Close `conn`. Both ends receive [`TransportEvent::Closed`]; for a
    /// connection that never opened, only the local end does.
    fn close(&mut self, conn: ConnectionId);
}
