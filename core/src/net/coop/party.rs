//! Party merge rule for a joined encounter
//!
//! Both peers build the battle roster independently and must agree, so the
//! rule uses only what each side already holds: the acceptor's advertised
//! members first, then the requester's. Each side contributes at most
//! [`MAX_ADVERTISED_ACTORS`]; a side with fewer simply leaves its slots out.
//! Peers of the same game often share actor ids, so a requester member
//! already on the roster is skipped; an actor never fills two slots.

use ghostlink_shared::{ActorId, MAX_ADVERTISED_ACTORS, snapshot::leading_actors};

/// Maximum battle roster length after a merge
pub const MERGED_ROSTER_SIZE: usize = MAX_ADVERTISED_ACTORS * 2;

/// Acceptor's leading members followed by the requester's that are not
/// already present
pub fn merge_rosters(acceptor: &[ActorId], requester: &[ActorId]) -> Vec<ActorId> {
    let mut roster = leading_actors(acceptor);
    for actor in leading_actors(requester) {
        if !roster.contains(&actor) {
            roster.push(actor);
        }
    }
    roster
}
