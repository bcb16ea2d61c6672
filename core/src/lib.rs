//! Ghostlink Core - co-op presence sync for tile-based RPGs
//!
//! Lets two players running their own copy of a game see each other as a
//! ghost on the map and pull each other into a shared battle.
//!
//! # Architecture
//!
//! - [`GameSession`] / [`GhostActor`] - implemented by the host engine
//! - [`Transport`] - implemented by the networking backend
//! - [`CoopSession`] - driven once per frame by the host loop
//! - [`CoopConfig`] - tuning, loadable from TOML

pub mod config;
pub mod game;
pub mod net;
#[cfg(test)]
pub mod test_utils;

pub use config::{ConfigError, CoopConfig, IndicatorConfig};
pub use game::{CombatIndicator, Direction, GameSession, GhostActor, IconFrame};
pub use net::{
    ConnectionState, CoopError, CoopEvent, CoopSession, GhostUpdate, HandshakeState, Interaction,
    JoinChoice, LoopbackNetwork, LoopbackTransport, Transport, TransportError,
};

// Re-export the wire types hosts need alongside the core
pub use ghostlink_shared::{ActorId, Appearance, EncounterId, GridPos, MapId, SessionId, Snapshot};
