//! # Showroom Wrapped Common Library
//!
//! Shared code for the Showroom Wrapped service:
//! - Room data model (room ids, dataset records)
//! - Bundled / configured dataset loading (rooms, trainee rooms, setlists)
//! - Configuration loading and resolution
//! - Currency formatting

pub mod config;
pub mod currency;
pub mod dataset;
pub mod error;
pub mod models;

pub use dataset::{RoomDataset, SetlistCatalog, TraineeIdSet};
pub use error::{Error, Result};
pub use models::{RoomId, RoomRecord};
