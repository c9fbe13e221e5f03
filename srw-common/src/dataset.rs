//! Static datasets loaded once at startup
//!
//! Three read-only collections back the service:
//! - [`RoomDataset`]: ordered list of known rooms with their 2024 live counts
//! - [`TraineeIdSet`]: rooms exempt from engagement estimation
//! - [`SetlistCatalog`]: show name to setlist image URL
//!
//! Each can be read from a JSON file or fall back to the copy bundled into the
//! binary. Values are built once and shared behind `Arc` by the services.

use crate::models::{RoomId, RoomRecord};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::info;

const BUNDLED_ROOMS: &str = include_str!("../data/rooms.json");
const BUNDLED_TRAINEES: &str = include_str!("../data/trainee_rooms.json");
const BUNDLED_SETLISTS: &str = include_str!("../data/setlists.json");

/// Image used when no setlist can be picked
pub const DEFAULT_SETLIST_IMAGE: &str =
    "https://upload.wikimedia.org/wikipedia/commons/thumb/8/82/JKT48.svg/1200px-JKT48.svg.png";

fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::Dataset {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| Error::Dataset {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

// ============================================================================
// Room dataset
// ============================================================================

/// Ordered, immutable collection of known rooms
#[derive(Debug, Clone, Default)]
pub struct RoomDataset {
    rooms: Vec<RoomRecord>,
}

impl RoomDataset {
    pub fn new(rooms: Vec<RoomRecord>) -> Self {
        Self { rooms }
    }

    /// Dataset compiled into the binary
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_ROOMS)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let rooms: Vec<RoomRecord> = serde_json::from_str(json)?;
        Ok(Self { rooms })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let rooms: Vec<RoomRecord> = read_json_file(path)?;
        info!(path = %path.display(), rooms = rooms.len(), "Loaded room dataset");
        Ok(Self { rooms })
    }

    /// Load from `path` when given, otherwise use the bundled dataset
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let dataset = Self::bundled()?;
                info!(rooms = dataset.len(), "Using bundled room dataset");
                Ok(dataset)
            }
        }
    }

    pub fn rooms(&self) -> &[RoomRecord] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

// ============================================================================
// Trainee set
// ============================================================================

/// Rooms whose visit count is reported as-is
#[derive(Debug, Clone, Default)]
pub struct TraineeIdSet {
    ids: HashSet<RoomId>,
}

impl TraineeIdSet {
    pub fn new<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<RoomId>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_TRAINEES)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let ids: Vec<RoomId> = serde_json::from_str(json)?;
        Ok(Self::new(ids))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let ids: Vec<RoomId> = read_json_file(path)?;
                info!(path = %path.display(), trainees = ids.len(), "Loaded trainee room list");
                Ok(Self::new(ids))
            }
            None => Self::bundled(),
        }
    }

    pub fn contains(&self, room_id: &RoomId) -> bool {
        self.ids.contains(room_id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

// ============================================================================
// Setlist catalog
// ============================================================================

/// Show name to setlist image URL, with a fixed fallback image
#[derive(Debug, Clone)]
pub struct SetlistCatalog {
    images: HashMap<String, String>,
    default_image: String,
}

impl Default for SetlistCatalog {
    fn default() -> Self {
        Self {
            images: HashMap::new(),
            default_image: DEFAULT_SETLIST_IMAGE.to_string(),
        }
    }
}

impl SetlistCatalog {
    pub fn new(images: HashMap<String, String>) -> Self {
        Self {
            images,
            ..Self::default()
        }
    }

    pub fn bundled() -> Result<Self> {
        Self::from_json_str(BUNDLED_SETLISTS)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let images: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::new(images))
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::new(read_json_file(path)?)),
            None => Self::bundled(),
        }
    }

    /// Image for `show`, or the default image when the show is unknown
    pub fn image_for(&self, show: &str) -> &str {
        self.images
            .get(show)
            .map(String::as_str)
            .unwrap_or(&self.default_image)
    }

    pub fn default_image(&self) -> &str {
        &self.default_image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundled_datasets_parse() {
        let rooms = RoomDataset::bundled().unwrap();
        assert!(!rooms.is_empty());

        let trainees = TraineeIdSet::bundled().unwrap();
        assert!(!trainees.is_empty());

        SetlistCatalog::bundled().unwrap();
    }

    #[test]
    fn test_bundled_setlists_cover_default_shows() {
        let catalog = SetlistCatalog::bundled().unwrap();

        for show in crate::config::DEFAULT_SHOWS {
            let image = catalog.image_for(show);
            assert_ne!(image, DEFAULT_SETLIST_IMAGE, "no setlist image for {}", show);
            assert!(image.starts_with("https://"), "bad image URL for {}", show);
        }
    }

    #[test]
    fn test_bundled_trainees_are_known_rooms() {
        let rooms = RoomDataset::bundled().unwrap();
        let trainees = TraineeIdSet::bundled().unwrap();

        let known = rooms
            .rooms()
            .iter()
            .filter(|r| trainees.contains(&r.room_id))
            .count();
        assert_eq!(known, trainees.len());
    }

    #[test]
    fn test_dataset_preserves_file_order() {
        let dataset = RoomDataset::from_json_str(
            r#"[
                {"room_id": 3, "full_name": "C", "total_live": {"sr_count": 1}},
                {"room_id": 1, "full_name": "A", "total_live": {"sr_count": 2}},
                {"room_id": 2, "full_name": "B", "total_live": {"sr_count": 3}}
            ]"#,
        )
        .unwrap();

        let names: Vec<&str> = dataset.rooms().iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_dataset_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"room_id": "10", "full_name": "Ten", "total_live": {{"sr_count": 5}}}}]"#
        )
        .unwrap();

        let dataset = RoomDataset::load(Some(file.path())).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.rooms()[0].total_live.sr_count, 5);
    }

    #[test]
    fn test_dataset_missing_file_reports_path() {
        let err = RoomDataset::load(Some(Path::new("/nonexistent/rooms.json"))).unwrap_err();
        match err {
            Error::Dataset { path, .. } => assert!(path.ends_with("rooms.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_trainee_membership() {
        let trainees = TraineeIdSet::from_json_str("[100, \"200\"]").unwrap();
        assert!(trainees.contains(&RoomId::from(100u64)));
        assert!(trainees.contains(&RoomId::from("200")));
        assert!(!trainees.contains(&RoomId::from("300")));
    }

    #[test]
    fn test_setlist_catalog_falls_back_to_default() {
        let catalog = SetlistCatalog::from_json_str(
            r#"{"Banzai": "https://img.example/banzai.png"}"#,
        )
        .unwrap();

        assert_eq!(catalog.image_for("Banzai"), "https://img.example/banzai.png");
        assert_eq!(catalog.image_for("Pajama"), DEFAULT_SETLIST_IMAGE);
    }
}
