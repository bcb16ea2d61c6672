//! Co-op protocol messages
//!
//! The message set is closed: periodic `state` snapshots in either
//! direction, plus the two-message join handshake.
//!
//! # Wire Format
//!
//! Each message is one JSON object tagged by its `type` field:
//!
//! ```text
//! {"type":"state","mapId":3,"x":10,"y":4,"charName":"Actor1","charIndex":0,"isFighting":false,"actors":[1,2]}
//! {"type":"request_join"}
//! {"type":"accept_join","troopId":5,"hostActors":[10,11]}
//! ```

use serde::{Deserialize, Serialize};

use crate::ids::{ActorId, EncounterId};
use crate::snapshot::Snapshot;

/// Top-level co-op message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CoopMessage {
    /// Periodic full snapshot (either direction)
    State(Snapshot),
    /// Ask to be merged into the receiver's running encounter
    RequestJoin,
    /// Grant a join request and seed the requester's roster
    AcceptJoin(AcceptJoin),
}

/// Reply to `request_join` from a peer that is in combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptJoin {
    /// Encounter the requester should enter
    pub troop_id: EncounterId,
    /// Acceptor's leading party members (at most two)
    pub host_actors: Vec<ActorId>,
}

impl CoopMessage {
    /// Wire name of this message's type
    pub fn kind(&self) -> &'static str {
        match self {
            Self::State(_) => "state",
            Self::RequestJoin => "request_join",
            Self::AcceptJoin(_) => "accept_join",
        }
    }

    /// Serialize to the JSON wire format
    pub fn to_bytes(&self) -> Vec<u8> {
        // A tagged enum of plain structs always serializes.
        serde_json::to_vec(self).unwrap_or_default()
    }

    /// Parse a JSON wire payload
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let value: serde_json::Value =
            serde_json::from_slice(bytes).map_err(|e| DecodeError::Malformed(e.to_string()))?;

        let kind = value
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(DecodeError::MissingType)?;
        if !matches!(kind, "state" | "request_join" | "accept_join") {
            return Err(DecodeError::UnknownType(kind.to_string()));
        }

        serde_json::from_value(value).map_err(|e| DecodeError::InvalidFields(e.to_string()))
    }
}

/// Error decoding a co-op message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Payload is not a JSON object
    #[error("malformed payload: {0}")]
    Malformed(String),
    /// No string `type` field
    #[error("message has no type field")]
    MissingType,
    /// `type` names a message outside the protocol
    #[error("unknown message type '{0}'")]
    UnknownType(String),
    /// Known type with missing or ill-typed fields
    #[error("invalid message fields: {0}")]
    InvalidFields(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::MapId;

    #[test]
    fn test_state_uses_wire_field_names() {
        let msg = CoopMessage::State(Snapshot {
            map_id: MapId(3),
            x: 10,
            y: 4,
            char_name: "Actor1".into(),
            char_index: 2,
            is_fighting: true,
            actors: vec![ActorId(1), ActorId(2)],
        });

        let json: serde_json::Value = serde_json::from_slice(&msg.to_bytes()).unwrap();
        assert_eq!(json["type"], "state");
        assert_eq!(json["mapId"], 3);
        assert_eq!(json["charName"], "Actor1");
        assert_eq!(json["charIndex"], 2);
        assert_eq!(json["isFighting"], true);
        assert_eq!(json["actors"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_decodes_peer_payloads() {
        let request = CoopMessage::from_bytes(br#"{"type":"request_join"}"#).unwrap();
        assert_eq!(request, CoopMessage::RequestJoin);

        let accept =
            CoopMessage::from_bytes(br#"{"type":"accept_join","troopId":5,"hostActors":[10,11]}"#)
                .unwrap();
        assert_eq!(
            accept,
            CoopMessage::AcceptJoin(AcceptJoin {
                troop_id: EncounterId(5),
                host_actors: vec![ActorId(10), ActorId(11)],
            })
        );
        assert_eq!(accept.kind(), "accept_join");
    }

    #[test]
    fn test_rejects_unknown_type() {
        let result = CoopMessage::from_bytes(br#"{"type":"chat","text":"hi"}"#);
        assert_eq!(result, Err(DecodeError::UnknownType("chat".into())));
    }

    #[test]
    fn test_rejects_missing_type() {
        let result = CoopMessage::from_bytes(br#"{"mapId":1}"#);
        assert_eq!(result, Err(DecodeError::MissingType));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            CoopMessage::from_bytes(b"\x00\x01not json"),
            Err(DecodeError::Malformed(_))
        ));
    }

    #[test]
    fn test_rejects_incomplete_state() {
        let result = CoopMessage::from_bytes(br#"{"type":"state","mapId":1}"#);
        assert!(matches!(result, Err(DecodeError::InvalidFields(_))));
    }
}
