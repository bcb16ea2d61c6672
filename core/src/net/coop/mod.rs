//! Co-op presence and battle-join protocol
//!
//! Two players each run their own game. Over one connection they exchange:
//!
//! - a full `state` snapshot on every heartbeat (position, map, leader
//!   appearance, combat flag, first two party members)
//! - a `request_join` / `accept_join` handshake that pulls the requester into
//!   the acceptor's running encounter with a merged party
//!
//! The partner appears on the local map as a ghost that walks toward the last
//! snapshot received.
//!
//! # Per-frame flow
//!
//! ```text
//!  tick(game)
//!    ├─ drain transport inbox ─▶ state / request_join / accept_join
//!    ├─ heartbeat due?        ─▶ sample game ─▶ send `state`
//!    └─ reconcile ghost       ─▶ hide / show / snap / step / combat icon
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use ghostlink_core::net::coop::{CoopSession, CoopEvent, Interaction, JoinChoice};
//!
//! let mut session = CoopSession::new(config, transport);
//! session.join("peer-7")?;
//!
//! // Every frame
//! for event in session.tick(&mut game) {
//!     if let CoopEvent::ConnectionLost = event { /* show notice */ }
//! }
//!
//! // When the player talks to the ghost
//! if session.on_ghost_activated() == Interaction::JoinPrompt {
//!     session.choose(JoinChoice::Join)?;
//! }
//! ```

pub mod handshake;
pub mod heartbeat;
pub mod party;
pub mod reconciler;
pub mod session;
pub mod state;
pub mod types;


pub use handshake::{Handshake, HandshakeState, Interaction, JoinChoice};
pub use heartbeat::Heartbeat;
pub use party::{MERGED_ROSTER_SIZE, merge_rosters};
pub use reconciler::{GhostReconciler, GhostUpdate, step_toward};
pub use session::CoopSession;
pub use state::SessionState;
pub use types::{ConnectionState, CoopError, CoopEvent};
