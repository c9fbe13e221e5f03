//! Upstream clients and the two aggregation services

pub mod engagement;
pub mod history_parser;
pub mod image_encoder;
pub mod live_history;
pub mod most_watch;
pub mod showroom_client;
pub mod waves;

pub use crate::types::FetchError;
pub use image_encoder::HttpImageEncoder;
pub use live_history::{LiveHistoryService, PremiumLiveSummary, ShowRanking};
pub use most_watch::{BatchReport, BatchSettings, MostWatchService, ProcessedRoom};
pub use showroom_client::ShowroomClient;
