//! In-process transport for tests and local demos
//!
//! A [`LoopbackNetwork`] is a shared hub; every [`LoopbackTransport`] made
//! from it registers under its identity when opened. Connecting to an
//! identity nobody registered behaves like a real transport that can't reach
//! the peer: no error, the connection just never opens. Closing such a
//! pending connection still reports `Closed` to its owner.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ghostlink_shared::SessionId;

use super::{ConnectionId, EventSender, Transport, TransportError, TransportEvent};

#[derive(Default)]
struct Hub {
    peers: HashMap<SessionId, EventSender>,
    links: HashMap<ConnectionId, (SessionId, SessionId)>,
    /// Outbound connections that never reached a peer, by owner
    pending: HashMap<ConnectionId, SessionId>,
    next_peer: u64,
    next_connection: u64,
}

impl Hub {
    fn notify(&self, peer: &SessionId, event: TransportEvent) {
        if let Some(sender) = self.peers.get(peer) {
            sender.send(event);
        }
    }
}

/// Shared in-memory hub connecting [`LoopbackTransport`]s
#[derive(Clone, Default)]
pub struct LoopbackNetwork {
    hub: Arc<Mutex<Hub>>,
}

impl LoopbackNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport that is assigned a generated identity when opened
    pub fn transport(&self) -> LoopbackTransport {
        LoopbackTransport {
            network: self.clone(),
            requested: None,
            identity: None,
        }
    }

    /// Transport that opens under a fixed identity
    pub fn transport_with_id(&self, id: impl Into<String>) -> LoopbackTransport {
        LoopbackTransport {
            network: self.clone(),
            requested: Some(SessionId::new(id)),
            identity: None,
        }
    }

    /// Drop a link as if the network failed. Both ends see it close; a
    /// connection that never opened is closed for its owner only.
    pub fn sever(&self, conn: ConnectionId) {
        let mut hub = self.hub();
        if let Some((a, b)) = hub.links.remove(&conn) {
            tracing::debug!(%conn, "loopback link severed");
            hub.notify(&a, TransportEvent::Closed(conn));
            hub.notify(&b, TransportEvent::Closed(conn));
        } else if let Some(owner) = hub.pending.remove(&conn) {
            tracing::debug!(%conn, "pending loopback connect cancelled");
            hub.notify(&owner, TransportEvent::Closed(conn));
        }
    }

    /// Number of live links
    pub fn link_count(&self) -> usize {
        self.hub().links.len()
    }

    fn hub(&self) -> MutexGuard<'_, Hub> {
        self.hub.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One endpoint on a [`LoopbackNetwork`]
pub struct LoopbackTransport {
    network: LoopbackNetwork,
    requested: Option<SessionId>,
    identity: Option<SessionId>,
}

impl LoopbackTransport {
    pub fn identity(&self) -> Option<&SessionId> {
        self.identity.as_ref()
    }
}

impl Transport for LoopbackTransport {
    fn open(&mut self, events: EventSender) -> Result<(), TransportError> {
        if self.identity.is_some() {
            return Ok(());
        }

        let mut hub = self.network.hub();
        let identity = match self.requested.clone() {
            Some(id) => id,
            None => {
                hub.next_peer += 1;
                SessionId::new(format!("peer-{}", hub.next_peer))
            }
        };
        if hub.peers.contains_key(&identity) {
            return Err(TransportError::Backend(format!(
                "identity '{}' already registered",
                identity
            )));
        }

        events.send(TransportEvent::Ready(identity.clone()));
        hub.peers.insert(identity.clone(), events);
        self.identity = Some(identity);
        Ok(())
    }

    fn connect(&mut self, remote: &SessionId) -> Result<ConnectionId, TransportError> {
        let local = self.identity.clone().ok_or(TransportError::NotOpen)?;

        let mut hub = self.network.hub();
        hub.next_connection += 1;
        let conn = ConnectionId(hub.next_connection);

        if *remote == local || !hub.peers.contains_key(remote) {
            tracing::debug!(%conn, remote = %remote, "loopback peer unreachable");
            hub.pending.insert(conn, local);
            return Ok(conn);
        }

        hub.links.insert(conn, (local.clone(), remote.clone()));
        hub.notify(remote, TransportEvent::Incoming(conn));
        hub.notify(remote, TransportEvent::Opened(conn));
        hub.notify(&local, TransportEvent::Opened(conn));
        Ok(conn)
    }

    fn send(&mut self, conn: ConnectionId, payload: &[u8]) -> Result<(), TransportError> {
        let local = self.identity.as_ref().ok_or(TransportError::NotOpen)?;

        let hub = self.network.hub();
        let (a, b) = hub
            .links
            .get(&conn)
            .ok_or(TransportError::UnknownConnection(conn))?;
        let other = if a == local { b } else { a };
        hub.notify(other, TransportEvent::Data(conn, payload.to_vec()));
        Ok(())
    }

    fn close(&mut self, conn: ConnectionId) {
        self.network.sever(conn);
    }
}

impl Drop for LoopbackTransport {
    fn drop(&mut self) {
        let Some(identity) = self.identity.take() else {
            return;
        };

        let mut hub = self.network.hub();
        hub.peers.remove(&identity);
        hub.pending.retain(|_, owner| *owner != identity);
        let dropped: Vec<(ConnectionId, SessionId)> = hub
            .links
            .iter()
            .filter_map(|(conn, (a, b))| {
                if *a == identity {
                    Some((*conn, b.clone()))
                } else if *b == identity {
                    Some((*conn, a.clone()))
                } else {
                    None
                }
            })
            .collect();
        for (conn, other) in dropped {
            hub.links.remove(&conn);
            hub.notify(&other, TransportEvent::Closed(conn));
        }
    }
}

impl std::fmt::Debug for LoopbackTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopbackTransport")
            .field("identity", &self.identity)
            .finish()
    }
}
