//! Room data model
//!
//! Room ids arrive as JSON numbers from the upstream API and from exported
//! dataset files, but hand-maintained lists sometimes quote them. Both forms
//! are accepted and normalised to a string id.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream room identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawRoomId", into = "String")]
pub struct RoomId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRoomId {
    Number(u64),
    Text(String),
}

impl From<RawRoomId> for RoomId {
    fn from(raw: RawRoomId) -> Self {
        match raw {
            RawRoomId::Number(n) => RoomId(n.to_string()),
            RawRoomId::Text(s) => RoomId(s.trim().to_string()),
        }
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        RoomId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RoomId {
    fn from(s: &str) -> Self {
        RoomId(s.to_string())
    }
}

impl From<u64> for RoomId {
    fn from(n: u64) -> Self {
        RoomId(n.to_string())
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Historical live-session counts for a room
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalLive {
    /// Number of SHOWROOM lives broadcast by the member
    #[serde(default)]
    pub sr_count: u64,
}

/// One known room in the static dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub room_id: RoomId,
    pub full_name: String,
    #[serde(default)]
    pub total_live: TotalLive,
}

impl RoomRecord {
    pub fn new(room_id: impl Into<RoomId>, full_name: impl Into<String>, sr_count: u64) -> Self {
        Self {
            room_id: room_id.into(),
            full_name: full_name.into(),
            total_live: TotalLive { sr_count },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_id_accepts_number_and_string() {
        let ids: Vec<RoomId> = serde_json::from_str(r#"[317727, "318239", " 42 "]"#).unwrap();
        assert_eq!(ids[0].as_str(), "317727");
        assert_eq!(ids[1].as_str(), "318239");
        assert_eq!(ids[2].as_str(), "42");
    }

    #[test]
    fn test_room_id_serializes_as_string() {
        let json = serde_json::to_string(&RoomId::from(317727u64)).unwrap();
        assert_eq!(json, r#""317727""#);
    }

    #[test]
    fn test_room_record_ignores_extra_fields() {
        let record: RoomRecord = serde_json::from_str(
            r#"{
                "room_id": 317727,
                "full_name": "Member One",
                "nickname": "one",
                "total_live": { "sr_count": 120, "idn_count": 3 }
            }"#,
        )
        .unwrap();

        assert_eq!(record.room_id, RoomId::from("317727"));
        assert_eq!(record.total_live.sr_count, 120);
    }

    #[test]
    fn test_room_record_missing_total_live_defaults_to_zero() {
        let record: RoomRecord =
            serde_json::from_str(r#"{ "room_id": 1, "full_name": "New" }"#).unwrap();
        assert_eq!(record.total_live.sr_count, 0);
    }
}
