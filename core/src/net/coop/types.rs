//! Core types for co-op sessions

use ghostlink_shared::{ActorId, EncounterId, SessionId};
use thiserror::Error;

use crate::net::transport::TransportError;

/// Connection lifecycle as seen by the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// Nothing attempted yet
    #[default]
    Idle,
    /// Outbound connect issued, waiting for the link to open
    Connecting,
    /// Link is up: heartbeats and reconciliation run
    Open,
    /// Link went away. A new `join` or inbound connection may reopen it.
    Closed,
}

/// User-visible notices produced by a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoopEvent {
    /// Hosting under `code`; share it with the partner
    Hosting { code: SessionId },
    /// Outbound connection to `code` started
    Connecting { code: SessionId },
    /// A partner connected to us
    PartnerConnected,
    /// Link is open
    Connected,
    /// Link closed; multiplayer features stop
    ConnectionLost,
    /// Join request sent; waiting for the partner's answer
    JoinRequested,
    /// Partner joined our running encounter
    PartnerJoinedBattle {
        encounter: EncounterId,
        roster: Vec<ActorId>,
    },
    /// We joined the partner's encounter
    JoinedEncounter {
        encounter: EncounterId,
        roster: Vec<ActorId>,
    },
}

/// Errors returned to the host from co-op calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoopError {
    #[error("room code is empty")]
    EmptyRoomCode,

    #[error("no join prompt is waiting for a choice")]
    NoPendingChoice,

    #[error("not connected to a partner")]
    NotConnected,

    #[error(transparent)]
    Transport(#[from] TransportError),
}
