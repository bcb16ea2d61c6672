//! Single-consumer wrapper around a transport backend

use std::collections::VecDeque;
use std::sync::mpsc::Receiver;

use ghostlink_shared::SessionId;

use super::{ConnectionId, EventSender, Transport, TransportError, TransportEvent};

/// What to do once the transport reports our identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadyAction {
    /// Surface the identity to the user as a room code
    Announce,
    /// Open an outbound connection to this room code
    Connect(SessionId),
}

/// Transport events after adapter bookkeeping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterEvent {
    /// Identity is known; run `action`
    Ready {
        identity: SessionId,
        action: ReadyAction,
    },
    /// An inbound connection replaced the current wiring
    Incoming(ConnectionId),
    /// The current connection opened
    Opened(ConnectionId),
    /// Payload from any connection wired into this session
    Data(ConnectionId, Vec<u8>),
    /// The current connection closed
    Closed(ConnectionId),
}

/// Owns one transport backend and its event inbox.
///
/// The backend is opened lazily on the first [`open`](Self::open) call and
/// never again; later calls get the cached identity. At most one connection
/// is current. An inbound connection silently replaces it (last writer
/// wins), and data still arriving on a replaced connection is delivered to
/// the same session.
pub struct TransportAdapter<T: Transport> {
    transport: T,
    sender: EventSender,
    inbox: Receiver<TransportEvent>,
    started: bool,
    identity: Option<SessionId>,
    pending: Vec<ReadyAction>,
    connection: Option<ConnectionId>,
    ready_queue: VecDeque<AdapterEvent>,
}

impl<T: Transport> TransportAdapter<T> {
    pub fn new(transport: T) -> Self {
        let (sender, inbox) = EventSender::channel();
        Self {
            transport,
            sender,
            inbox,
            started: false,
            identity: None,
            pending: Vec::new(),
            connection: None,
            ready_queue: VecDeque::new(),
        }
    }

    /// Identity assigned by the transport, once it is ready
    pub fn identity(&self) -> Option<&SessionId> {
        self.identity.as_ref()
    }

    /// Current connection, if any
    pub fn connection(&self) -> Option<ConnectionId> {
        self.connection
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Open the transport (once) and schedule `action` for when it is ready.
    ///
    /// Returns the identity straight away if the transport is already
    /// ready; the caller runs `action` itself in that case. Otherwise the
    /// action comes back later as [`AdapterEvent::Ready`].
    pub fn open(&mut self, action: ReadyAction) -> Result<Option<SessionId>, TransportError> {
        if let Some(identity) = &self.identity {
            return Ok(Some(identity.clone()));
        }

        // A failed open must not leave the action queued for a later retry
        if !self.started {
            self.transport.open(self.sender.clone())?;
            self.started = true;
            tracing::debug!("transport opening");
        }
        self.pending.push(action);
        Ok(None)
    }

    /// Start an outbound connection and make it current
    pub fn connect(&mut self, remote: &SessionId) -> Result<ConnectionId, TransportError> {
        if self.identity.is_none() {
            return Err(TransportError::NotOpen);
        }
        let conn = self.transport.connect(remote)?;
        self.wire(conn);
        tracing::info!(%conn, remote = %remote, "connecting");
        Ok(conn)
    }

    /// Fire-and-forget send on the current connection
    pub fn send(&mut self, payload: &[u8]) {
        let Some(conn) = self.connection else {
            tracing::debug!("no connection, dropping send");
            return;
        };
        if let Err(e) = self.transport.send(conn, payload) {
            tracing::debug!(%conn, error = %e, "send failed");
        }
    }

    /// Close the current connection. The close event arrives on a later poll.
    pub fn close(&mut self) {
        if let Some(conn) = self.connection {
            self.transport.close(conn);
        }
    }

    /// Next event for the tick loop, or `None` once the inbox is empty
    pub fn poll(&mut self) -> Option<AdapterEvent> {
        loop {
            if let Some(event) = self.ready_queue.pop_front() {
                return Some(event);
            }
            let raw = self.inbox.try_recv().ok()?;
            if let Some(event) = self.translate(raw) {
                return Some(event);
            }
        }
    }

    /// Drain every queued event
    pub fn drain(&mut self) -> Vec<AdapterEvent> {
        std::iter::from_fn(|| self.poll()).collect()
    }

    fn wire(&mut self, conn: ConnectionId) {
        if let Some(old) = self.connection.replace(conn) {
            if old != conn {
                tracing::debug!(old = %old, new = %conn, "connection replaced");
            }
        }
    }

    fn translate(&mut self, raw: TransportEvent) -> Option<AdapterEvent> {
        match raw {
            TransportEvent::Ready(identity) => {
                if self.identity.is_none() {
                    tracing::info!(identity = %identity, "transport ready");
                    self.identity = Some(identity);
                }
                let identity = self.identity.clone()?;
                for action in self.pending.drain(..) {
                    self.ready_queue.push_back(AdapterEvent::Ready {
                        identity: identity.clone(),
                        action,
                    });
                }
                None
            }
            TransportEvent::Incoming(conn) => {
                self.wire(conn);
                tracing::info!(%conn, "inbound connection");
                Some(AdapterEvent::Incoming(conn))
            }
            TransportEvent::Opened(conn) => {
                if self.connection == Some(conn) {
                    Some(AdapterEvent::Opened(conn))
                } else {
                    tracing::debug!(%conn, "ignoring open of replaced connection");
                    None
                }
            }
            TransportEvent::Data(conn, payload) => {
                if self.connection != Some(conn) {
                    tracing::trace!(%conn, "data on replaced connection");
                }
                Some(AdapterEvent::Data(conn, payload))
            }
            TransportEvent::Closed(conn) => {
                if self.connection == Some(conn) {
                    self.connection = None;
                    Some(AdapterEvent::Closed(conn))
                } else {
                    tracing::warn!(%conn, "replaced connection closed");
                    None
                }
            }
        }
    }
}
