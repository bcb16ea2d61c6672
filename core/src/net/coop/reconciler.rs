//! Ghost reconciliation
//!
//! Runs every frame and walks the ghost toward the last known remote cell.
//! This is dead reckoning to a single snapshot, not interpolation between
//! timestamped samples:
//!
//! 1. No ghost on the map: nothing to do.
//! 2. Peer on another map: hide the ghost, leave its position alone.
//! 3. Show the ghost and swap its sprite if the peer's appearance changed.
//! 4. Peer in combat: hold position, float the combat indicator.
//! 5. Otherwise snap if farther than the teleport threshold, else take one
//!    grid step toward the target, resolving the larger axis first.

use ghostlink_shared::{GridPos, Snapshot};

use crate::config::{CoopConfig, IndicatorConfig};
use crate::game::{CombatIndicator, Direction, GameSession, GhostActor, IconFrame};

/// Ghost opacity while the peer shares our map
pub const OPAQUE: u8 = 255;
/// Ghost opacity while the peer is elsewhere
pub const TRANSPARENT: u8 = 0;

/// What one reconciliation pass did to the ghost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostUpdate {
    /// No ghost marker on the current map
    Missing,
    /// Peer is on another map; ghost hidden
    Hidden,
    /// Peer is fighting; movement held, indicator shown
    InCombat,
    /// Ghost jumped straight to the target cell
    Snapped(GridPos),
    /// Ghost walked one cell
    Stepped(Direction),
    /// Ghost already on the target cell
    Idle,
}

/// Drives the ghost from the remote snapshot
#[derive(Debug, Clone)]
pub struct GhostReconciler {
    marker: String,
    teleport_threshold: u32,
    catch_up_distance: u32,
    walk_speed: u8,
    catch_up_speed: u8,
    frame_ms: f32,
    indicator: IndicatorConfig,
}

impl GhostReconciler {
    pub fn new(config: &CoopConfig) -> Self {
        Self {
            marker: config.ghost_marker.clone(),
            teleport_threshold: config.teleport_threshold,
            catch_up_distance: config.catch_up_distance,
            walk_speed: config.walk_speed,
            catch_up_speed: config.catch_up_speed,
            frame_ms: 1000.0 / config.frame_rate.max(1) as f32,
            indicator: config.indicator.clone(),
        }
    }

    /// Marker name the ghost is located by
    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Run one pass against `remote`. `frame` times the indicator animation.
    pub fn reconcile<G: GameSession>(&self, game: &mut G, remote: &Snapshot, frame: u64) -> GhostUpdate {
        let local_map = game.map_id();
        let Some(ghost) = game.find_ghost(&self.marker) else {
            return GhostUpdate::Missing;
        };

        if remote.map_id != local_map {
            ghost.set_opacity(TRANSPARENT);
            return GhostUpdate::Hidden;
        }
        ghost.set_opacity(OPAQUE);

        if !remote.has_appearance(&ghost.appearance()) {
            ghost.set_appearance(remote.appearance());
        }

        if remote.is_fighting {
            ghost.set_combat_indicator(Some(self.combat_indicator(frame)));
            return GhostUpdate::InCombat;
        }
        ghost.set_combat_indicator(None);

        let current = ghost.position();
        let target = remote.position();
        let distance = current.manhattan(target);

        if distance > self.teleport_threshold {
            tracing::debug!(?current, ?target, distance, "ghost snapped");
            ghost.set_position(target);
            return GhostUpdate::Snapped(target);
        }

        match step_toward(current, target) {
            Some(direction) => {
                let speed = if distance > self.catch_up_distance {
                    self.catch_up_speed
                } else {
                    self.walk_speed
                };
                ghost.set_move_speed(speed);
                ghost.step(direction);
                tracing::trace!(?direction, distance, "ghost step");
                GhostUpdate::Stepped(direction)
            }
            None => GhostUpdate::Idle,
        }
    }

    /// Indicator for animation frame `frame`
    pub fn combat_indicator(&self, frame: u64) -> CombatIndicator {
        let style = &self.indicator;
        let per_row = style.icons_per_row.max(1);
        let icon = style.icon_index;

        let elapsed_ms = frame as f32 * self.frame_ms;
        let bob = (elapsed_ms / style.bob_period_ms).sin() * style.bob_amplitude;

        CombatIndicator {
            icon,
            frame: IconFrame {
                x: (icon % per_row) * style.icon_size,
                y: (icon / per_row) * style.icon_size,
                width: style.icon_size,
                height: style.icon_size,
            },
            offset_y: -style.float_height + bob,
        }
    }
}

/// Direction of the next step from `from` to `to`.
///
/// The axis with the larger gap goes first; on a tie the vertical axis
/// moves. `None` when already there.
pub fn step_toward(from: GridPos, to: GridPos) -> Option<Direction> {
    let dx = from.x - to.x;
    let dy = from.y - to.y;

    if dx.abs() > dy.abs() {
        Some(if dx > 0 { Direction::Left } else { Direction::Right })
    } else if dy != 0 {
        Some(if dy > 0 { Direction::Up } else { Direction::Down })
    } else {
        None
    }
}
