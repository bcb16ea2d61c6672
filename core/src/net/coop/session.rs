//! Co-op session facade
//!
//! Owns the transport adapter and every piece of per-session state. The host
//! loop calls [`CoopSession::tick`] once per frame and
//! [`CoopSession::on_ghost_activated`] from its interaction dispatcher; all
//! transport callbacks are queued and applied inside `tick`, so state only
//! ever changes on the caller's thread.

use ghostlink_shared::{CoopMessage, SessionId, Snapshot};

use super::handshake::{Handshake, HandshakeState, Interaction, JoinChoice};
use super::heartbeat::Heartbeat;
use super::reconciler::{GhostReconciler, GhostUpdate};
use super::state::SessionState;
use super::types::{ConnectionState, CoopError, CoopEvent};
use crate::config::CoopConfig;
use crate::game::GameSession;
use crate::net::transport::{AdapterEvent, ReadyAction, Transport, TransportAdapter};

/// One peer's side of a co-op session
pub struct CoopSession<T: Transport> {
    config: CoopConfig,
    adapter: TransportAdapter<T>,
    connection: ConnectionState,
    state: SessionState,
    heartbeat: Heartbeat,
    reconciler: GhostReconciler,
    handshake: Handshake,
    /// Notices raised outside `tick`, handed out on the next one
    notices: Vec<CoopEvent>,
    /// Frames ticked since creation
    frame: u64,
    /// One more reconcile is owed after a close so the ghost hides
    settle_after_close: bool,
    last_update: Option<GhostUpdate>,
}

impl<T: Transport> CoopSession<T> {
    pub fn new(config: CoopConfig, transport: T) -> Self {
        let heartbeat = Heartbeat::new(config.sync_interval);
        let reconciler = GhostReconciler::new(&config);
        Self {
            config,
            adapter: TransportAdapter::new(transport),
            connection: ConnectionState::Idle,
            state: SessionState::new(),
            heartbeat,
            reconciler,
            handshake: Handshake::new(),
            notices: Vec::new(),
            frame: 0,
            settle_after_close: false,
            last_update: None,
        }
    }

    pub fn config(&self) -> &CoopConfig {
        &self.config
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    /// Our room code, once the transport is ready
    pub fn identity(&self) -> Option<&SessionId> {
        self.adapter.identity()
    }

    /// Last snapshot received from the partner
    pub fn remote(&self) -> &Snapshot {
        self.state.remote()
    }

    /// Last snapshot sampled from the local game
    pub fn local(&self) -> &Snapshot {
        self.state.local()
    }

    pub fn handshake_state(&self) -> HandshakeState {
        self.handshake.state()
    }

    /// What the reconciler did on the most recent tick that ran it
    pub fn last_ghost_update(&self) -> Option<GhostUpdate> {
        self.last_update
    }

    pub fn heartbeats_sent(&self) -> u64 {
        self.heartbeat.sent()
    }

    pub fn transport(&self) -> &T {
        self.adapter.transport()
    }

    /// Open the transport and announce our room code.
    ///
    /// The code arrives as [`CoopEvent::Hosting`], immediately if the
    /// transport was already open, otherwise once it reports ready.
    pub fn host(&mut self) -> Result<(), CoopError> {
        if let Some(identity) = self.adapter.open(ReadyAction::Announce)? {
            self.announce(identity);
        }
        Ok(())
    }

    /// Open the transport and connect to the partner's room code
    pub fn join(&mut self, code: &str) -> Result<(), CoopError> {
        let code = SessionId::from_room_code(code).ok_or(CoopError::EmptyRoomCode)?;
        if self.adapter.open(ReadyAction::Connect(code.clone()))?.is_some() {
            self.connect(code)?;
        }
        Ok(())
    }

    /// Close the current connection. The close lands on a later tick.
    pub fn disconnect(&mut self) {
        tracing::info!("disconnecting");
        self.adapter.close();
    }

    /// The user activated the ghost
    pub fn on_ghost_activated(&mut self) -> Interaction {
        self.handshake.activate(self.state.remote().is_fighting)
    }

    /// Answer the join prompt raised by [`on_ghost_activated`](Self::on_ghost_activated)
    pub fn choose(&mut self, choice: JoinChoice) -> Result<(), CoopError> {
        if !self.handshake.awaiting_choice() {
            return Err(CoopError::NoPendingChoice);
        }
        if choice == JoinChoice::Join && self.connection != ConnectionState::Open {
            return Err(CoopError::NotConnected);
        }

        if self.handshake.choose(choice) {
            self.send(&CoopMessage::RequestJoin);
            self.notices.push(CoopEvent::JoinRequested);
            tracing::info!("join request sent");
        }
        Ok(())
    }

    /// Advance one frame: apply queued transport events, send the heartbeat
    /// on cadence boundaries, then reconcile the ghost.
    pub fn tick<G: GameSession>(&mut self, game: &mut G) -> Vec<CoopEvent> {
        self.frame += 1;
        let mut events = std::mem::take(&mut self.notices);

        while let Some(event) = self.adapter.poll() {
            self.dispatch(event, game, &mut events);
        }

        if self.connection == ConnectionState::Open {
            if self.heartbeat.advance() {
                self.broadcast(game);
            }
            self.last_update = Some(self.reconciler.reconcile(game, self.state.remote(), self.frame));
        } else if self.settle_after_close {
            self.settle_after_close = false;
            self.last_update = Some(self.reconciler.reconcile(game, self.state.remote(), self.frame));
        }

        events
    }

    fn dispatch<G: GameSession>(&mut self, event: AdapterEvent, game: &mut G, events: &mut Vec<CoopEvent>) {
        match event {
            AdapterEvent::Ready { identity, action } => match action {
                ReadyAction::Announce => {
                    self.announce(identity);
                    events.append(&mut self.notices);
                }
                ReadyAction::Connect(code) => {
                    if let Err(e) = self.connect(code) {
                        tracing::warn!(error = %e, "connect failed");
                    }
                    events.append(&mut self.notices);
                }
            },
            AdapterEvent::Incoming(conn) => {
                tracing::info!(%conn, "partner connected");
                self.connection = ConnectionState::Connecting;
                events.push(CoopEvent::PartnerConnected);
            }
            AdapterEvent::Opened(conn) => {
                tracing::info!(%conn, "connection open");
                self.connection = ConnectionState::Open;
                self.settle_after_close = false;
                events.push(CoopEvent::Connected);
                // Hello: the partner sees us before the first cadence boundary
                self.broadcast(game);
            }
            AdapterEvent::Data(conn, payload) => match CoopMessage::from_bytes(&payload) {
                Ok(message) => {
                    tracing::debug!(%conn, kind = message.kind(), "message received");
                    self.handle_message(message, game, events);
                }
                Err(e) => {
                    tracing::warn!(%conn, error = %e, "dropping undecodable payload");
                }
            },
            AdapterEvent::Closed(conn) => {
                tracing::info!(%conn, "connection closed");
                self.connection = ConnectionState::Closed;
                self.handshake.reset();
                if self.config.clear_remote_on_close {
                    self.state.reset_remote();
                    self.settle_after_close = true;
                }
                events.push(CoopEvent::ConnectionLost);
            }
        }
    }

    fn handle_message<G: GameSession>(
        &mut self,
        message: CoopMessage,
        game: &mut G,
        events: &mut Vec<CoopEvent>,
    ) {
        match message {
            CoopMessage::State(snapshot) => self.state.apply_remote(snapshot),
            CoopMessage::RequestJoin => {
                let Some(accept) = self.handshake.on_request_join(game, self.state.remote()) else {
                    return;
                };
                let encounter = accept.troop_id;
                self.send(&CoopMessage::AcceptJoin(accept));
                events.push(CoopEvent::PartnerJoinedBattle {
                    encounter,
                    roster: game.party(),
                });
            }
            CoopMessage::AcceptJoin(accept) => {
                let roster = self.handshake.on_accept_join(game, &accept);
                events.push(CoopEvent::JoinedEncounter {
                    encounter: accept.troop_id,
                    roster,
                });
            }
        }
    }

    fn announce(&mut self, identity: SessionId) {
        tracing::info!(code = %identity, "hosting");
        self.notices.push(CoopEvent::Hosting { code: identity });
    }

    fn connect(&mut self, code: SessionId) -> Result<(), CoopError> {
        self.adapter.connect(&code)?;
        self.connection = ConnectionState::Connecting;
        self.notices.push(CoopEvent::Connecting { code });
        Ok(())
    }

    fn broadcast<G: GameSession>(&mut self, game: &G) {
        let snapshot = self.state.sample(game).clone();
        tracing::trace!(frame = self.frame, "heartbeat");
        self.send(&CoopMessage::State(snapshot));
    }

    fn send(&mut self, message: &CoopMessage) {
        self.adapter.send(&message.to_bytes());
    }
}

impl<T: Transport> std::fmt::Debug for CoopSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoopSession")
            .field("identity", &self.adapter.identity())
            .field("connection", &self.connection)
            .field("handshake", &self.handshake.state())
            .field("frame", &self.frame)
            .finish()
    }
}
