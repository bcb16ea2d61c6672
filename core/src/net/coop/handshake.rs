//! Battle-join handshake
//!
//! # Flow
//!
//! ```text
//! Requester                                   Acceptor (in combat)
//!     |  activate ghost, peer fighting             |
//!     |  -> AwaitingChoice                         |
//!     |  choose(Join) -> RequestSent               |
//!     |---------------- request_join ------------->|
//!     |                                            |  roster = own 2 + requester 2
//!     |<------ accept_join{troopId, hostActors} ---|  -> Merged
//!     |  roster = host 2 + own 2                   |
//!     |  start encounter troopId -> Merged         |
//! ```
//!
//! A request that reaches a peer outside combat is ignored and never
//! answered. Nothing times out; the requester stays in `RequestSent` until
//! an answer arrives or the connection closes.

use ghostlink_shared::{AcceptJoin, ActorId, Snapshot, snapshot::leading_actors};

use super::party::merge_rosters;
use crate::game::GameSession;

/// Handshake progress on this side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandshakeState {
    #[default]
    Idle,
    /// Join prompt is on screen
    AwaitingChoice,
    /// `request_join` sent, no answer yet
    RequestSent,
    /// Rosters merged into a shared encounter
    Merged,
}

/// Result of activating the ghost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    /// Peer is not fighting: show the informational "partner" message
    Partner,
    /// Peer is fighting: offer to join the battle
    JoinPrompt,
}

/// Answer to the join prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinChoice {
    Join,
    Decline,
}

/// Join handshake state machine for one session
#[derive(Debug, Clone, Default)]
pub struct Handshake {
    state: HandshakeState,
    before_prompt: HandshakeState,
}

impl Handshake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    /// The user activated the ghost while the peer's combat flag is
    /// `peer_fighting`
    pub fn activate(&mut self, peer_fighting: bool) -> Interaction {
        if !peer_fighting {
            return Interaction::Partner;
        }
        if self.state != HandshakeState::AwaitingChoice {
            self.before_prompt = self.state;
            self.state = HandshakeState::AwaitingChoice;
        }
        Interaction::JoinPrompt
    }

    /// Whether a prompt is waiting for [`choose`](Self::choose)
    pub fn awaiting_choice(&self) -> bool {
        self.state == HandshakeState::AwaitingChoice
    }

    /// Resolve the open prompt. Returns true when `request_join` must be
    /// sent; false when there was no prompt or the user declined.
    pub fn choose(&mut self, choice: JoinChoice) -> bool {
        if !self.awaiting_choice() {
            return false;
        }
        match choice {
            JoinChoice::Join => {
                self.state = HandshakeState::RequestSent;
                true
            }
            JoinChoice::Decline => {
                self.state = self.before_prompt;
                false
            }
        }
    }

    /// Handle `request_join` from the peer whose last snapshot is
    /// `requester`.
    ///
    /// Outside combat the request is dropped. In combat the local party
    /// becomes our leading members plus the requester's, and the reply
    /// advertises our leading members.
    pub fn on_request_join<G: GameSession>(
        &mut self,
        game: &mut G,
        requester: &Snapshot,
    ) -> Option<AcceptJoin> {
        let Some(encounter) = game.active_encounter() else {
            tracing::debug!("join request ignored, not in combat");
            return None;
        };

        let host_actors = leading_actors(&game.party());
        let roster = merge_rosters(&host_actors, &requester.leading_actors());
        game.set_party(&roster);
        self.state = HandshakeState::Merged;

        tracing::info!(%encounter, ?roster, "partner joined battle");
        Some(AcceptJoin {
            troop_id: encounter,
            host_actors,
        })
    }

    /// Handle `accept_join`: adopt the acceptor's encounter with the merged
    /// roster. Returns the roster now in effect.
    pub fn on_accept_join<G: GameSession>(&mut self, game: &mut G, accept: &AcceptJoin) -> Vec<ActorId> {
        if self.state != HandshakeState::RequestSent {
            tracing::warn!(state = ?self.state, "accept_join without a pending request");
        }

        let roster = merge_rosters(&accept.host_actors, &game.party());
        game.set_party(&roster);
        game.start_encounter(accept.troop_id);
        self.state = HandshakeState::Merged;

        tracing::info!(encounter = %accept.troop_id, ?roster, "joined partner encounter");
        roster
    }

    /// Back to idle, e.g. after the connection closed
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use ghostlink_shared::{EncounterId, GridPos, MapId};

    use super::*;
    use crate::test_utils::TestGame;

    fn ids(raw: &[u32]) -> Vec<ActorId> {
        raw.iter().copied().map(ActorId).collect()
    }

    fn peer(actors: &[u32], fighting: bool) -> Snapshot {
        Snapshot {
            map_id: MapId(1),
            is_fighting: fighting,
            actors: ids(actors),
            ..Snapshot::default()
        }
    }

    #[test]
    fn test_partner_message_when_peer_calm() {
        let mut handshake = Handshake::new();
        assert_eq!(handshake.activate(false), Interaction::Partner);
        assert_eq!(handshake.state(), HandshakeState::Idle);
    }

    #[test]
    fn test_prompt_then_join() {
        let mut handshake = Handshake::new();
        assert_eq!(handshake.activate(true), Interaction::JoinPrompt);
        assert_eq!(handshake.state(), HandshakeState::AwaitingChoice);
        assert!(handshake.choose(JoinChoice::Join));
        assert_eq!(handshake.state(), HandshakeState::RequestSent);
    }

    #[test]
    fn test_decline_restores_previous_state() {
        let mut handshake = Handshake::new();
        handshake.activate(true);
        assert!(!handshake.choose(JoinChoice::Decline));
        assert_eq!(handshake.state(), HandshakeState::Idle);

        handshake.activate(true);
        handshake.choose(JoinChoice::Join);
        handshake.activate(true);
        assert!(!handshake.choose(JoinChoice::Decline));
        assert_eq!(handshake.state(), HandshakeState::RequestSent);
    }

    #[test]
    fn test_repeated_requests_are_not_deduplicated() {
        let mut handshake = Handshake::new();
        handshake.activate(true);
        assert!(handshake.choose(JoinChoice::Join));
        handshake.activate(true);
        assert!(handshake.choose(JoinChoice::Join));
        assert_eq!(handshake.state(), HandshakeState::RequestSent);
    }

    #[test]
    fn test_choose_without_prompt_is_noop() {
        let mut handshake = Handshake::new();
        assert!(!handshake.choose(JoinChoice::Join));
        assert_eq!(handshake.state(), HandshakeState::Idle);
    }

    #[test]
    fn test_request_ignored_outside_combat() {
        let mut game = TestGame::new(MapId(1), GridPos::new(0, 0));
        game.party = ids(&[10, 11, 12]);
        let mut handshake = Handshake::new();

        assert_eq!(handshake.on_request_join(&mut game, &peer(&[20, 21], false)), None);
        assert_eq!(game.party, ids(&[10, 11, 12]));
        assert_eq!(handshake.state(), HandshakeState::Idle);
    }

    #[test]
    fn test_request_in_combat_merges_and_accepts() {
        let mut game = TestGame::new(MapId(1), GridPos::new(0, 0));
        game.party = ids(&[10, 11, 12, 13]);
        game.encounter = Some(EncounterId(5));
        let mut handshake = Handshake::new();

        let accept = handshake
            .on_request_join(&mut game, &peer(&[20, 21], false))
            .unwrap();
        assert_eq!(
            accept,
            AcceptJoin {
                troop_id: EncounterId(5),
                host_actors: ids(&[10, 11]),
            }
        );
        assert_eq!(game.party, ids(&[10, 11, 20, 21]));
        assert_eq!(handshake.state(), HandshakeState::Merged);
    }

    #[test]
    fn test_accept_merges_and_starts_encounter() {
        let mut game = TestGame::new(MapId(1), GridPos::new(0, 0));
        game.party = ids(&[20, 21, 22]);
        let mut handshake = Handshake::new();
        handshake.activate(true);
        handshake.choose(JoinChoice::Join);

        let roster = handshake.on_accept_join(
            &mut game,
            &AcceptJoin {
                troop_id: EncounterId(5),
                host_actors: ids(&[10]),
            },
        );
        assert_eq!(roster, ids(&[10, 20, 21]));
        assert_eq!(game.party, roster);
        assert_eq!(game.started, vec![EncounterId(5)]);
        assert_eq!(handshake.state(), HandshakeState::Merged);
    }

    #[test]
    fn test_unsolicited_accept_is_still_applied() {
        let mut game = TestGame::new(MapId(1), GridPos::new(0, 0));
        game.party = ids(&[20]);
        let mut handshake = Handshake::new();

        handshake.on_accept_join(
            &mut game,
            &AcceptJoin {
                troop_id: EncounterId(9),
                host_actors: ids(&[10, 11]),
            },
        );
        assert_eq!(game.party, ids(&[10, 11, 20]));
        assert_eq!(game.started, vec![EncounterId(9)]);
    }
}
