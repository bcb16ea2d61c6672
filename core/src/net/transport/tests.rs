//! Tests for the transport adapter and loopback backend

use ghostlink_shared::SessionId;

use super::*;

fn open_adapter(network: &LoopbackNetwork, id: &str) -> TransportAdapter<LoopbackTransport> {
    let mut adapter = TransportAdapter::new(network.transport_with_id(id));
    assert_eq!(adapter.open(ReadyAction::Announce).unwrap(), None);
    let events = adapter.drain();
    assert_eq!(
        events,
        vec![AdapterEvent::Ready {
            identity: SessionId::new(id),
            action: ReadyAction::Announce,
        }]
    );
    adapter
}

#[test]
fn test_open_is_lazy_and_idempotent() {
    let network = LoopbackNetwork::new();
    let mut adapter = TransportAdapter::new(network.transport());
    assert!(adapter.identity().is_none());

    assert_eq!(adapter.open(ReadyAction::Announce).unwrap(), None);
    // Second call before the ready event is queued, not re-opened
    assert_eq!(adapter.open(ReadyAction::Announce).unwrap(), None);

    let events = adapter.drain();
    assert_eq!(events.len(), 2);
    let identity = adapter.identity().cloned().unwrap();
    assert!(identity.as_str().starts_with("peer-"));

    // Once ready, the cached identity comes back immediately
    assert_eq!(
        adapter.open(ReadyAction::Connect(SessionId::new("x"))).unwrap(),
        Some(identity)
    );
    assert!(adapter.drain().is_empty());
}

#[test]
fn test_connect_opens_both_ends() {
    let network = LoopbackNetwork::new();
    let mut host = open_adapter(&network, "host");
    let mut guest = open_adapter(&network, "guest");

    let conn = guest.connect(&SessionId::new("host")).unwrap();
    assert_eq!(guest.connection(), Some(conn));
    assert_eq!(guest.drain(), vec![AdapterEvent::Opened(conn)]);

    assert_eq!(
        host.drain(),
        vec![AdapterEvent::Incoming(conn), AdapterEvent::Opened(conn)]
    );
    assert_eq!(host.connection(), Some(conn));
    assert_eq!(network.link_count(), 1);
}

#[test]
fn test_send_delivers_to_peer() {
    let network = LoopbackNetwork::new();
    let mut host = open_adapter(&network, "host");
    let mut guest = open_adapter(&network, "guest");
    let conn = guest.connect(&SessionId::new("host")).unwrap();
    host.drain();
    guest.drain();

    guest.send(b"hello");
    host.send(b"welcome");

    assert_eq!(host.drain(), vec![AdapterEvent::Data(conn, b"hello".to_vec())]);
    assert_eq!(
        guest.drain(),
        vec![AdapterEvent::Data(conn, b"welcome".to_vec())]
    );
}

#[test]
fn test_unreachable_peer_never_opens() {
    let network = LoopbackNetwork::new();
    let mut guest = open_adapter(&network, "guest");

    let conn = guest.connect(&SessionId::new("nobody")).unwrap();
    assert_eq!(guest.connection(), Some(conn));
    assert!(guest.drain().is_empty());
    assert_eq!(network.link_count(), 0);

    // Sending into the void is silently dropped
    guest.send(b"anyone?");
    assert!(guest.drain().is_empty());
}

#[test]
fn test_connect_before_ready_fails() {
    let network = LoopbackNetwork::new();
    let mut adapter = TransportAdapter::new(network.transport());
    assert_eq!(
        adapter.connect(&SessionId::new("host")),
        Err(TransportError::NotOpen)
    );
}

#[test]
fn test_close_reaches_both_ends() {
    let network = LoopbackNetwork::new();
    let mut host = open_adapter(&network, "host");
    let mut guest = open_adapter(&network, "guest");
    let conn = guest.connect(&SessionId::new("host")).unwrap();
    host.drain();
    guest.drain();

    guest.close();
    assert_eq!(guest.drain(), vec![AdapterEvent::Closed(conn)]);
    assert_eq!(host.drain(), vec![AdapterEvent::Closed(conn)]);
    assert_eq!(host.connection(), None);
    assert_eq!(guest.connection(), None);
}

#[test]
fn test_inbound_connection_replaces_current() {
    let network = LoopbackNetwork::new();
    let mut host = open_adapter(&network, "host");
    let mut first = open_adapter(&network, "first");
    let mut second = open_adapter(&network, "second");

    let old = first.connect(&SessionId::new("host")).unwrap();
    host.drain();
    let new = second.connect(&SessionId::new("host")).unwrap();
    assert_eq!(
        host.drain(),
        vec![AdapterEvent::Incoming(new), AdapterEvent::Opened(new)]
    );
    assert_eq!(host.connection(), Some(new));

    // Data on the replaced link still reaches the session
    first.drain();
    first.send(b"still here");
    assert_eq!(
        host.drain(),
        vec![AdapterEvent::Data(old, b"still here".to_vec())]
    );

    // Closing the replaced link does not close the current one
    network.sever(old);
    assert!(host.drain().is_empty());
    assert_eq!(host.connection(), Some(new));
}

#[test]
fn test_dropping_transport_closes_links() {
    let network = LoopbackNetwork::new();
    let mut host = open_adapter(&network, "host");
    let conn = {
        let mut guest = open_adapter(&network, "guest");
        guest.connect(&SessionId::new("host")).unwrap()
    };

    assert_eq!(
        host.drain(),
        vec![
            AdapterEvent::Incoming(conn),
            AdapterEvent::Opened(conn),
            AdapterEvent::Closed(conn)
        ]
    );
    assert_eq!(network.link_count(), 0);
}

#[test]
fn test_duplicate_identity_is_rejected() {
    let network = LoopbackNetwork::new();
    let _host = open_adapter(&network, "host");

    let mut clash = TransportAdapter::new(network.transport_with_id("host"));
    assert!(matches!(
        clash.open(ReadyAction::Announce),
        Err(TransportError::Backend(_))
    ));
}

#[test]
fn test_events_from_another_thread() {
    let network = LoopbackNetwork::new();
    let mut host = open_adapter(&network, "host");
    let mut guest = open_adapter(&network, "guest");
    let conn = guest.connect(&SessionId::new("host")).unwrap();
    host.drain();

    let handle = std::thread::spawn(move || {
        for i in 0..10u8 {
            guest.send(&[i]);
        }
        guest
    });
    let _guest = handle.join().unwrap();

    let payloads: Vec<Vec<u8>> = host
        .drain()
        .into_iter()
        .map(|event| match event {
            AdapterEvent::Data(c, payload) => {
                assert_eq!(c, conn);
                payload
            }
            other => panic!("unexpected event {:?}", other),
        })
        .collect();
    assert_eq!(payloads, (0..10u8).map(|i| vec![i]).collect::<Vec<_>>());
}

/// Loopback backend whose first `open` fails
struct FlakyOpen {
    inner: LoopbackTransport,
    failures: u32,
}

impl Transport for FlakyOpen {
    fn open(&mut self, events: EventSender) -> Result<(), TransportError> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(TransportError::Backend("signalling server unreachable".into()));
        }
        self.inner.open(events)
    }

    fn connect(&mut self, remote: &SessionId) -> Result<ConnectionId, TransportError> {
        self.inner.connect(remote)
    }

    fn send(&mut self, conn: ConnectionId, payload: &[u8]) -> Result<(), TransportError> {
        self.inner.send(conn, payload)
    }

    fn close(&mut self, conn: ConnectionId) {
        self.inner.close(conn)
    }
}

#[test]
fn test_failed_open_drops_action() {
    let network = LoopbackNetwork::new();
    let mut adapter = TransportAdapter::new(FlakyOpen {
        inner: network.transport_with_id("me"),
        failures: 1,
    });

    assert!(matches!(
        adapter.open(ReadyAction::Connect(SessionId::new("old-room"))),
        Err(TransportError::Backend(_))
    ));
    assert!(adapter.drain().is_empty());

    assert_eq!(adapter.open(ReadyAction::Announce).unwrap(), None);
    assert_eq!(
        adapter.drain(),
        vec![AdapterEvent::Ready {
            identity: SessionId::new("me"),
            action: ReadyAction::Announce,
        }]
    );
}

#[test]
fn test_close_cancels_pending_connect() {
    let network = LoopbackNetwork::new();
    let mut guest = open_adapter(&network, "guest");

    let conn = guest.connect(&SessionId::new("nobody")).unwrap();
    assert!(guest.drain().is_empty());

    guest.close();
    assert_eq!(guest.drain(), vec![AdapterEvent::Closed(conn)]);
    assert_eq!(guest.connection(), None);

    // Already gone: a second close reports nothing
    guest.close();
    assert!(guest.drain().is_empty());
}
