//! Full-state snapshot exchanged on every heartbeat.
//!
//! A [`Snapshot`] is never merged with an earlier one: each `state` message
//! replaces whatever the receiver held before.

use serde::{Deserialize, Serialize};

use crate::ids::{ActorId, MapId};

/// Number of party members a peer advertises, and the per-side share of a
/// merged battle roster.
pub const MAX_ADVERTISED_ACTORS: usize = 2;

/// A cell on a map grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance between two cells.
    pub fn manhattan(self, other: GridPos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Visual identity of a character: sprite sheet name plus index within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Appearance {
    pub sheet: String,
    pub index: u32,
}

impl Appearance {
    pub fn new(sheet: impl Into<String>, index: u32) -> Self {
        Self {
            sheet: sheet.into(),
            index,
        }
    }
}

/// Position, map, appearance, combat flag and advertised party of one peer.
///
/// Field names follow the wire format (`mapId`, `charName`, ...). The
/// default value is the neutral snapshot held before anything arrives:
/// map 0, cell (0,0), not fighting, empty party.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub map_id: MapId,
    pub x: i32,
    pub y: i32,
    pub char_name: String,
    pub char_index: u32,
    pub is_fighting: bool,
    pub actors: Vec<ActorId>,
}

impl Snapshot {
    pub fn position(&self) -> GridPos {
        GridPos::new(self.x, self.y)
    }

    pub fn appearance(&self) -> Appearance {
        Appearance::new(self.char_name.clone(), self.char_index)
    }

    /// Whether this snapshot's appearance matches `appearance`, without
    /// allocating.
    pub fn has_appearance(&self, appearance: &Appearance) -> bool {
        self.char_name == appearance.sheet && self.char_index == appearance.index
    }

    /// The advertised party, cut to the per-side share and stripped of
    /// invalid ids.
    pub fn leading_actors(&self) -> Vec<ActorId> {
        leading_actors(&self.actors)
    }
}

/// Stable slice of the first [`MAX_ADVERTISED_ACTORS`] valid members.
///
/// Both peers run the same cut so a merged roster comes out identical on
/// each side.
pub fn leading_actors(members: &[ActorId]) -> Vec<ActorId> {
    members
        .iter()
        .copied()
        .filter(|actor| actor.is_valid())
        .take(MAX_ADVERTISED_ACTORS)
        .collect()
}
