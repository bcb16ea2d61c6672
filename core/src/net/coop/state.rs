//! Local and remote snapshots held by a co-op session

use ghostlink_shared::{Appearance, Snapshot, snapshot::leading_actors};

use crate::game::GameSession;

/// Snapshot bookkeeping for one session.
///
/// The remote snapshot starts neutral and is replaced wholesale by every
/// `state` message.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    local: Snapshot,
    remote: Snapshot,
    remote_updates: u64,
    received: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last snapshot sampled from the local game
    pub fn local(&self) -> &Snapshot {
        &self.local
    }

    /// Last snapshot received from the peer
    pub fn remote(&self) -> &Snapshot {
        &self.remote
    }

    /// Number of `state` messages applied since creation
    pub fn remote_updates(&self) -> u64 {
        self.remote_updates
    }

    /// Whether any `state` message has arrived since the last reset
    pub fn has_remote(&self) -> bool {
        self.received
    }

    /// Sample the local game into a fresh snapshot
    pub fn sample<G: GameSession>(&mut self, game: &G) -> &Snapshot {
        let pos = game.player_position();
        let appearance = game.leader_appearance().unwrap_or_else(Appearance::default);
        self.local = Snapshot {
            map_id: game.map_id(),
            x: pos.x,
            y: pos.y,
            char_name: appearance.sheet,
            char_index: appearance.index,
            is_fighting: game.in_combat(),
            actors: leading_actors(&game.party()),
        };
        &self.local
    }

    /// Replace the remote snapshot with `snapshot`
    pub fn apply_remote(&mut self, snapshot: Snapshot) {
        self.remote = snapshot;
        self.remote_updates += 1;
        self.received = true;
    }

    /// Forget the peer: back to the neutral snapshot
    pub fn reset_remote(&mut self) {
        self.remote = Snapshot::default();
        self.received = false;
    }
}
