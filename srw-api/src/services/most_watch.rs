//! Most-watched rooms aggregation
//!
//! Fetches every room of the dataset with the caller's session, estimates the
//! 2024 visit count and returns the rooms sorted by that estimate.
//!
//! # Flow
//! 1. Dataset is split into waves of `concurrent_limit` rooms
//! 2. Each room: profile fetch raced against `profile_timeout`, then image
//!    encode
//! 3. Failed rooms are logged and dropped; the batch always completes
//! 4. Survivors get `visit_2024` and are sorted descending (stable)

use serde::Serialize;
use srw_common::config::UpstreamConfig;
use srw_common::{RoomDataset, RoomId, RoomRecord, TraineeIdSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::engagement;
use super::waves::{run_in_waves, wave_count, with_deadline};
use crate::types::{FetchError, ImageEncoder, RoomProfileSource};

/// A room that was fetched successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedProfile {
    pub room_id: RoomId,
    pub name: String,
    pub image: String,
    pub total_live_member: u64,
    pub all_visit: u64,
}

/// Output unit of `/most-watch`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedRoom {
    pub room_id: RoomId,
    pub name: String,
    pub image: String,
    pub total_live_member: u64,
    pub all_visit: u64,
    pub visit_2024: u64,
}

impl ProcessedRoom {
    fn from_profile(profile: FetchedProfile, trainees: &TraineeIdSet) -> Self {
        let visit_2024 = engagement::visit_2024(
            &profile.room_id,
            profile.all_visit,
            profile.total_live_member,
            trainees,
        );
        Self {
            room_id: profile.room_id,
            name: profile.name,
            image: profile.image,
            total_live_member: profile.total_live_member,
            all_visit: profile.all_visit,
            visit_2024,
        }
    }
}

/// Outcome counts of the most recent batch, reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub rooms: usize,
    pub fetched: usize,
    pub skipped: usize,
}

/// Wave width and per-room deadline
#[derive(Debug, Clone, Copy)]
pub struct BatchSettings {
    pub concurrent_limit: usize,
    pub profile_timeout: Duration,
}

impl From<&UpstreamConfig> for BatchSettings {
    fn from(config: &UpstreamConfig) -> Self {
        Self {
            concurrent_limit: config.concurrent_limit,
            profile_timeout: config.profile_timeout(),
        }
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self::from(&UpstreamConfig::default())
    }
}

/// Batch scheduler + estimator behind `POST /most-watch`
pub struct MostWatchService {
    dataset: Arc<RoomDataset>,
    trainees: Arc<TraineeIdSet>,
    profiles: Arc<dyn RoomProfileSource>,
    images: Arc<dyn ImageEncoder>,
    settings: BatchSettings,
    last_report: RwLock<Option<BatchReport>>,
}

impl MostWatchService {
    pub fn new(
        dataset: Arc<RoomDataset>,
        trainees: Arc<TraineeIdSet>,
        profiles: Arc<dyn RoomProfileSource>,
        images: Arc<dyn ImageEncoder>,
        settings: BatchSettings,
    ) -> Self {
        Self {
            dataset,
            trainees,
            profiles,
            images,
            settings,
            last_report: RwLock::new(None),
        }
    }

    /// Counts from the most recent completed batch, if any
    pub async fn last_report(&self) -> Option<BatchReport> {
        *self.last_report.read().await
    }

    /// Rooms fetched with `token`, sorted by `visit_2024` descending
    ///
    /// Rooms whose fetch failed are absent from the result; their count is
    /// kept in [`Self::last_report`].
    pub async fn most_watched(&self, token: &str) -> Vec<ProcessedRoom> {
        let rooms = self.dataset.rooms();
        info!(
            rooms = rooms.len(),
            waves = wave_count(rooms.len(), self.settings.concurrent_limit),
            "Aggregating most-watched rooms"
        );

        let outcomes = run_in_waves(rooms, self.settings.concurrent_limit, |record| {
            self.fetch_room(record, token)
        })
        .await;

        let mut fetched = Vec::with_capacity(outcomes.len());
        for (record, outcome) in rooms.iter().zip(outcomes) {
            match outcome {
                Ok(profile) => fetched.push(profile),
                Err(e) => warn!(
                    room_id = %record.room_id,
                    error = %e,
                    "Error fetching room data, skipping room"
                ),
            }
        }

        let mut processed: Vec<ProcessedRoom> = fetched
            .into_iter()
            .map(|profile| ProcessedRoom::from_profile(profile, &self.trainees))
            .collect();
        sort_by_visits(&mut processed);

        let report = BatchReport {
            rooms: rooms.len(),
            fetched: processed.len(),
            skipped: rooms.len() - processed.len(),
        };
        info!(
            fetched = report.fetched,
            skipped = report.skipped,
            "Most-watched aggregation complete"
        );
        *self.last_report.write().await = Some(report);
        processed
    }

    /// Fetch one room: profile under deadline, then inline its image
    async fn fetch_room(&self, record: &RoomRecord, token: &str) -> Result<FetchedProfile, FetchError> {
        let profile = with_deadline(
            self.settings.profile_timeout,
            self.profiles.fetch_profile(&record.room_id, token),
        )
        .await?;

        let image_url = profile
            .image
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| FetchError::Image("profile has no image".to_string()))?;
        let image = self.images.encode(image_url).await?;

        debug!(room_id = %record.room_id, visit_count = ?profile.visit_count, "Room fetched");

        Ok(FetchedProfile {
            room_id: profile.room_id.unwrap_or_else(|| record.room_id.clone()),
            name: record.full_name.clone(),
            image,
            total_live_member: record.total_live.sr_count,
            all_visit: profile.visit_count.unwrap_or(0),
        })
    }
}

/// Descending by `visit_2024`; equal values keep their fetch order
pub fn sort_by_visits(rooms: &mut [ProcessedRoom]) {
    rooms.sort_by(|a, b| b.visit_2024.cmp(&a.visit_2024));
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use crate::types::RoomProfile;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Behaviour of one mocked room
    #[derive(Clone)]
    pub enum MockRoom {
        Visits(u64),
        Fail,
        Hang,
    }

    /// In-memory profile source keyed by room id
    pub struct MockProfiles {
        pub rooms: HashMap<String, MockRoom>,
        pub calls: AtomicUsize,
        pub last_token: std::sync::Mutex<Option<String>>,
    }

    impl MockProfiles {
        pub fn new(rooms: impl IntoIterator<Item = (&'static str, MockRoom)>) -> Self {
            Self {
                rooms: rooms.into_iter().map(|(id, r)| (id.to_string(), r)).collect(),
                calls: AtomicUsize::new(0),
                last_token: std::sync::Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl RoomProfileSource for MockProfiles {
        async fn fetch_profile(&self, room_id: &RoomId, token: &str) -> Result<RoomProfile, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_token.lock().unwrap() = Some(token.to_string());

            match self.rooms.get(room_id.as_str()).cloned() {
                Some(MockRoom::Visits(visits)) => Ok(RoomProfile {
                    room_id: Some(room_id.clone()),
                    image: Some(format!("https://img.example/{}.jpeg", room_id)),
                    visit_count: Some(visits),
                }),
                Some(MockRoom::Fail) | None => Err(FetchError::Status(404)),
                Some(MockRoom::Hang) => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Err(FetchError::Network("unreachable".to_string()))
                }
            }
        }
    }

    /// Encoder returning a fake data URI, optionally failing for some URLs
    #[derive(Default)]
    pub struct MockImages {
        pub fail_containing: Option<String>,
    }

    #[async_trait]
    impl ImageEncoder for MockImages {
        async fn encode(&self, url: &str) -> Result<String, FetchError> {
            if let Some(needle) = &self.fail_containing {
                if url.contains(needle.as_str()) {
                    return Err(FetchError::Image(format!("{} unavailable", url)));
                }
            }
            Ok(format!("data:image/jpeg;base64,{}", url.len()))
        }
    }
}
