//! Collaborator traits and shared types
//!
//! The services talk to the upstream site only through these traits:
//! - [`RoomProfileSource`]: room profile JSON endpoint
//! - [`PaidLiveHistorySource`]: paid-live history HTML page
//! - [`ImageEncoder`]: fetch an image and inline it as base64
//!
//! Production implementations live in `services::showroom_client` and
//! `services::image_encoder`; tests substitute in-memory mocks.

use serde::Deserialize;
use srw_common::RoomId;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single upstream unit of work
///
/// For room profiles this is recovered locally: the room is logged and
/// dropped from the result set.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Deadline elapsed before the response arrived
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Upstream answered with a non-success status
    #[error("Upstream returned HTTP {0}")]
    Status(u16),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Image could not be fetched or encoded
    #[error("Image error: {0}")]
    Image(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            FetchError::Status(status.as_u16())
        } else if e.is_decode() {
            FetchError::Parse(e.to_string())
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Room profile as returned by `/api/room/profile`
///
/// Only the fields the aggregation needs; everything else is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomProfile {
    #[serde(default)]
    pub room_id: Option<RoomId>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub visit_count: Option<u64>,
}

/// Upstream room profile endpoint
#[async_trait::async_trait]
pub trait RoomProfileSource: Send + Sync {
    /// Fetch one room's profile, sending `token` as the session cookie
    async fn fetch_profile(&self, room_id: &RoomId, token: &str) -> Result<RoomProfile, FetchError>;
}

/// Upstream paid-live history page
#[async_trait::async_trait]
pub trait PaidLiveHistorySource: Send + Sync {
    /// Fetch the raw HTML of the caller's paid-live history
    async fn fetch_history_page(&self, token: &str) -> Result<String, FetchError>;
}

/// Image fetch-and-encode collaborator
#[async_trait::async_trait]
pub trait ImageEncoder: Send + Sync {
    /// Download `url` and return it as a `data:` URI with base64 payload
    async fn encode(&self, url: &str) -> Result<String, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parses_numeric_room_id() {
        let profile: RoomProfile = serde_json::from_str(
            r#"{
                "room_id": 317727,
                "image": "https://static.example/317727.jpeg",
                "visit_count": 64,
                "follower_num": 12000
            }"#,
        )
        .unwrap();

        assert_eq!(profile.room_id, Some(RoomId::from("317727")));
        assert_eq!(profile.visit_count, Some(64));
        assert!(profile.image.is_some());
    }

    #[test]
    fn test_profile_tolerates_missing_fields() {
        let profile: RoomProfile = serde_json::from_str("{}").unwrap();
        assert!(profile.room_id.is_none());
        assert!(profile.visit_count.is_none());
    }
}
