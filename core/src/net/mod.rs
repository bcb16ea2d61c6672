//! Networking for co-op play
//!
//! - [`transport`] - transport trait, single-consumer adapter, loopback backend
//! - [`coop`] - snapshot sync, ghost reconciliation, battle-join handshake
//!
//! # Architecture
//!
//! ```text
//!                    ┌────────────────────┐
//!                    │   Host game loop   │
//!                    └─────────┬──────────┘
//!                              │ tick / on_ghost_activated
//!                    ┌─────────▼──────────┐
//!                    │    CoopSession     │
//!                    │ (sync + handshake) │
//!                    └─────────┬──────────┘
//!                              │ JSON messages
//!                    ┌─────────▼──────────┐
//!                    │  TransportAdapter  │
//!                    │ (P2P data channel) │
//!                    └────────────────────┘
//! ```

pub mod coop;
pub mod transport;

pub use coop::{
    ConnectionState, CoopError, CoopEvent, CoopSession, GhostUpdate, HandshakeState, Interaction,
    JoinChoice,
};
pub use transport::{
    ConnectionId, EventSender, LoopbackNetwork, LoopbackTransport, Transport, TransportError,
    TransportEvent,
};
