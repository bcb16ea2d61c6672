//! Shared test utilities for unit and scenario tests

use ghostlink_shared::{ActorId, Appearance, EncounterId, GridPos, MapId};

use crate::game::{CombatIndicator, Direction, GameSession, GhostActor};

/// Marker name the default config looks for
pub const GHOST_MARKER: &str = "RemotePlayer";

// ============================================================================
// Test Ghost
// ============================================================================

/// Ghost map object that records everything done to it
#[derive(Debug, Clone)]
pub struct TestGhost {
    pub pos: GridPos,
    pub appearance: Appearance,
    pub appearance_changes: u32,
    pub opacity: u8,
    pub speed: u8,
    pub steps: Vec<Direction>,
    pub indicator: Option<CombatIndicator>,
}

impl TestGhost {
    pub fn new(pos: GridPos) -> Self {
        Self {
            pos,
            appearance: Appearance::default(),
            appearance_changes: 0,
            opacity: 255,
            speed: 0,
            steps: Vec::new(),
            indicator: None,
        }
    }
}

impl GhostActor for TestGhost {
    fn position(&self) -> GridPos {
        self.pos
    }

    fn set_position(&mut self, pos: GridPos) {
        self.pos = pos;
    }

    fn appearance(&self) -> Appearance {
        self.appearance.clone()
    }

    fn set_appearance(&mut self, appearance: Appearance) {
        self.appearance = appearance;
        self.appearance_changes += 1;
    }

    fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
    }

    fn set_move_speed(&mut self, speed: u8) {
        self.speed = speed;
    }

    fn step(&mut self, direction: Direction) {
        self.pos = direction.apply(self.pos);
        self.steps.push(direction);
    }

    fn set_combat_indicator(&mut self, indicator: Option<CombatIndicator>) {
        self.indicator = indicator;
    }
}

// ============================================================================
// Test Game
// ============================================================================

/// In-memory game session
#[derive(Debug, Clone)]
pub struct TestGame {
    pub map: MapId,
    pub position: GridPos,
    pub leader: Option<Appearance>,
    pub encounter: Option<EncounterId>,
    pub party: Vec<ActorId>,
    pub ghost_marker: String,
    pub ghost: Option<TestGhost>,
    /// Every encounter started through [`GameSession::start_encounter`]
    pub started: Vec<EncounterId>,
}

impl TestGame {
    pub fn new(map: MapId, position: GridPos) -> Self {
        Self {
            map,
            position,
            leader: Some(Appearance::new("Hero", 0)),
            encounter: None,
            party: vec![ActorId(1), ActorId(2)],
            ghost_marker: GHOST_MARKER.to_string(),
            ghost: None,
            started: Vec::new(),
        }
    }

    /// Place a ghost map object at `pos`
    pub fn with_ghost(mut self, pos: GridPos) -> Self {
        self.ghost = Some(TestGhost::new(pos));
        self
    }

    pub fn with_party(mut self, members: &[u32]) -> Self {
        self.party = members.iter().copied().map(ActorId).collect();
        self
    }

    /// The placed ghost. Panics if none was placed.
    pub fn ghost(&self) -> &TestGhost {
        self.ghost.as_ref().expect("no ghost placed")
    }
}

impl GameSession for TestGame {
    type Ghost = TestGhost;

    fn map_id(&self) -> MapId {
        self.map
    }

    fn player_position(&self) -> GridPos {
        self.position
    }

    fn leader_appearance(&self) -> Option<Appearance> {
        self.leader.clone()
    }

    fn active_encounter(&self) -> Option<EncounterId> {
        self.encounter
    }

    fn party(&self) -> Vec<ActorId> {
        self.party.clone()
    }

    fn set_party(&mut self, roster: &[ActorId]) {
        self.party = roster.to_vec();
    }

    fn start_encounter(&mut self, encounter: EncounterId) {
        self.encounter = Some(encounter);
        self.started.push(encounter);
    }

    fn find_ghost(&mut self, marker: &str) -> Option<&mut TestGhost> {
        if marker == self.ghost_marker {
            self.ghost.as_mut()
        } else {
            None
        }
    }
}
