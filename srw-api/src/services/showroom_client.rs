//! SHOWROOM upstream client
//!
//! Two endpoints are used, both authenticated by forwarding the caller's
//! session cookie verbatim:
//! - `GET /api/room/profile?room_id={id}`: room profile JSON
//! - `GET /paid_live/hist`: paid-live purchase history HTML
//!
//! Per-request deadlines for room profiles are applied by the caller (see
//! `services::waves::with_deadline`); the client-wide timeout only bounds the
//! history page.

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::Client;
use srw_common::config::UpstreamConfig;
use srw_common::RoomId;
use tracing::debug;

use crate::types::{FetchError, PaidLiveHistorySource, RoomProfile, RoomProfileSource};

const PROFILE_PATH: &str = "/api/room/profile";
const PAID_LIVE_HISTORY_PATH: &str = "/paid_live/hist";

/// HTTP client for the SHOWROOM site
pub struct ShowroomClient {
    http_client: Client,
    base_url: String,
}

impl ShowroomClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let http_client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn profile_url(&self) -> String {
        format!("{}{}", self.base_url, PROFILE_PATH)
    }

    fn history_url(&self) -> String {
        format!("{}{}", self.base_url, PAID_LIVE_HISTORY_PATH)
    }
}

#[async_trait]
impl RoomProfileSource for ShowroomClient {
    async fn fetch_profile(&self, room_id: &RoomId, token: &str) -> Result<RoomProfile, FetchError> {
        debug!(room_id = %room_id, "Fetching room profile");

        let response = self
            .http_client
            .get(self.profile_url())
            .query(&[("room_id", room_id.as_str())])
            .header(COOKIE, token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<RoomProfile>()
            .await
            .map_err(|e| FetchError::Parse(format!("room {} profile: {}", room_id, e)))
    }
}

#[async_trait]
impl PaidLiveHistorySource for ShowroomClient {
    async fn fetch_history_page(&self, token: &str) -> Result<String, FetchError> {
        debug!("Fetching paid-live history page");

        let response = self
            .http_client
            .get(self.history_url())
            .header(COOKIE, token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        Ok(response.text().await?)
    }
}
