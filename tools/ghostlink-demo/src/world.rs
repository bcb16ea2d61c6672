//! Minimal headless game world for the demo peers

use ghostlink_core::net::coop::step_toward;
use ghostlink_core::{CombatIndicator, Direction, GameSession, GhostActor};
use ghostlink_shared::{ActorId, Appearance, EncounterId, GridPos, MapId};

/// Map object standing in for the partner
#[derive(Debug, Clone)]
pub struct DemoGhost {
    pub marker: String,
    pub pos: GridPos,
    pub appearance: Appearance,
    pub opacity: u8,
    pub speed: u8,
    pub indicator: Option<CombatIndicator>,
}

impl GhostActor for DemoGhost {
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
        tracing::debug!(sheet = %appearance.sheet, index = appearance.index, "ghost sprite");
        self.appearance = appearance;
    }

    fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
    }

    fn set_move_speed(&mut self, speed: u8) {
        self.speed = speed;
    }

    fn step(&mut self, direction: Direction) {
        self.pos = direction.apply(self.pos);
    }

    fn set_combat_indicator(&mut self, indicator: Option<CombatIndicator>) {
        self.indicator = indicator;
    }
}

/// One player's game
#[derive(Debug, Clone)]
pub struct DemoWorld {
    pub name: &'static str,
    pub map: MapId,
    pub position: GridPos,
    pub leader: Appearance,
    pub encounter: Option<EncounterId>,
    pub party: Vec<ActorId>,
    pub ghost: DemoGhost,
}

impl DemoWorld {
    pub fn new(name: &'static str, marker: &str, position: GridPos, party: &[u32]) -> Self {
        Self {
            name,
            map: MapId(1),
            position,
            leader: Appearance::new(name, 0),
            encounter: None,
            party: party.iter().copied().map(ActorId).collect(),
            ghost: DemoGhost {
                marker: marker.to_string(),
                pos: GridPos::new(0, 0),
                appearance: Appearance::default(),
                opacity: 0,
                speed: 0,
                indicator: None,
            },
        }
    }

    /// Move the player one cell toward `target`. Returns false once there.
    pub fn walk_toward(&mut self, target: GridPos) -> bool {
        match step_toward(self.position, target) {
            Some(direction) => {
                self.position = direction.apply(self.position);
                true
            }
            None => false,
        }
    }
}

impl GameSession for DemoWorld {
    type Ghost = DemoGhost;

    fn map_id(&self) -> MapId {
        self.map
    }

    fn player_position(&self) -> GridPos {
        self.position
    }

    fn leader_appearance(&self) -> Option<Appearance> {
        if self.party.is_empty() {
            None
        } else {
            Some(self.leader.clone())
        }
    }

    fn active_encounter(&self) -> Option<EncounterId> {
        self.encounter
    }

    fn party(&self) -> Vec<ActorId> {
        self.party.clone()
    }

    fn set_party(&mut self, roster: &[ActorId]) {
        tracing::info!(world = self.name, ?roster, "party replaced");
        self.party = roster.to_vec();
    }

    fn start_encounter(&mut self, encounter: EncounterId) {
        tracing::info!(world = self.name, %encounter, "battle started");
        self.encounter = Some(encounter);
    }

    fn find_ghost(&mut self, marker: &str) -> Option<&mut DemoGhost> {
        (self.ghost.marker == marker).then_some(&mut self.ghost)
    }
}
