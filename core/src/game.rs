//! Host game collaborator traits
//!
//! The co-op core never owns game state. The host engine implements
//! [`GameSession`] to expose the local session and [`GhostActor`] for the
//! map object that represents the remote player.

use ghostlink_shared::{ActorId, Appearance, EncounterId, GridPos, MapId};

/// One grid step in a cardinal direction. Y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Down,
    Left,
    Right,
    Up,
}

impl Direction {
    /// Cell reached by stepping once from `pos`.
    pub fn apply(self, pos: GridPos) -> GridPos {
        match self {
            Self::Down => GridPos::new(pos.x, pos.y + 1),
            Self::Left => GridPos::new(pos.x - 1, pos.y),
            Self::Right => GridPos::new(pos.x + 1, pos.y),
            Self::Up => GridPos::new(pos.x, pos.y - 1),
        }
    }
}

/// Region of an icon atlas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconFrame {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Floating icon shown above a ghost whose player is in combat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatIndicator {
    /// Icon index in the atlas
    pub icon: u32,
    /// Atlas region to draw
    pub frame: IconFrame,
    /// Vertical offset from the ghost's feet (negative is up)
    pub offset_y: f32,
}

/// Read/write access to the local game session.
pub trait GameSession {
    /// Map object type used for the ghost
    type Ghost: GhostActor;

    /// Current map
    fn map_id(&self) -> MapId;

    /// Local player's cell
    fn player_position(&self) -> GridPos;

    /// Visual identity of the party leader, if the party is not empty
    fn leader_appearance(&self) -> Option<Appearance>;

    /// Encounter the local party is fighting, if any
    fn active_encounter(&self) -> Option<EncounterId>;

    /// Active party members in slot order
    fn party(&self) -> Vec<ActorId>;

    /// Replace the party with `roster`, in order
    fn set_party(&mut self, roster: &[ActorId]);

    /// Push the host into a combat encounter
    fn start_encounter(&mut self, encounter: EncounterId);

    /// Locate the ghost by the marker name the map author gave it
    fn find_ghost(&mut self, marker: &str) -> Option<&mut Self::Ghost>;

    /// Whether the local party is in a combat encounter
    fn in_combat(&self) -> bool {
        self.active_encounter().is_some()
    }
}

/// Map object that renders the remote player.
pub trait GhostActor {
    fn position(&self) -> GridPos;

    /// Move directly to `pos` without walking
    fn set_position(&mut self, pos: GridPos);

    fn appearance(&self) -> Appearance;

    fn set_appearance(&mut self, appearance: Appearance);

    /// 0 = fully transparent, 255 = fully opaque
    fn set_opacity(&mut self, opacity: u8);

    fn set_move_speed(&mut self, speed: u8);

    /// Walk one cell. The host may refuse an impassable step.
    fn step(&mut self, direction: Direction);

    /// Show (`Some`) or hide (`None`) the combat indicator
    fn set_combat_indicator(&mut self, indicator: Option<CombatIndicator>);
}
