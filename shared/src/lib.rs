//! Shared types for Ghostlink co-op peers.
//!
//! Everything that crosses the wire lives here so both ends of a link agree
//! on one definition:
//!
//! - [`ids`] - identifier newtypes (session, map, actor, encounter)
//! - [`snapshot`] - the full per-heartbeat state record and its parts
//! - [`messages`] - the closed set of co-op messages and their JSON codec

pub mod ids;
pub mod messages;
pub mod snapshot;

pub use ids::{ActorId, EncounterId, MapId, SessionId};
pub use messages::{AcceptJoin, CoopMessage, DecodeError};
pub use snapshot::{Appearance, GridPos, MAX_ADVERTISED_ACTORS, Snapshot};
