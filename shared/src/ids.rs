//! Identifier newtypes used on the wire.
//!
//! All numeric ids serialize transparently so the JSON matches the plain
//! integers peers exchange.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Session identity assigned by the transport when it opens.
///
/// Immutable for the lifetime of the process. The joining side uses the
/// host's identity as the room code it connects to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Parse a room code typed or pasted by a user.
    ///
    /// Surrounding whitespace is dropped. Returns `None` if nothing is left.
    pub fn from_room_code(code: &str) -> Option<Self> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Map identifier. `MapId(0)` is the neutral "no map" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapId(pub u32);

/// Party member identifier.
///
/// Zero never names a real member; rosters drop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u32);

impl ActorId {
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }
}

/// Combat encounter identifier (the troop a battle is set up from).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncounterId(pub u32);

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_code_is_trimmed() {
        let id = SessionId::from_room_code("  abc-123\n").unwrap();
        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn test_blank_room_code_is_rejected() {
        assert!(SessionId::from_room_code("").is_none());
        assert!(SessionId::from_room_code("   \t").is_none());
    }

    #[test]
    fn test_zero_actor_is_invalid() {
        assert!(!ActorId(0).is_valid());
        assert!(ActorId(7).is_valid());
    }
}
