//! srw-api library interface
//!
//! Exposes the router, application state and services for the binary and for
//! integration tests.

pub mod api;
pub mod error;
pub mod services;
pub mod types;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use srw_common::config::{ServerConfig, TomlConfig};
use srw_common::{RoomDataset, SetlistCatalog, TraineeIdSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::services::{
    BatchSettings, FetchError, HttpImageEncoder, LiveHistoryService, MostWatchService,
    ShowroomClient,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Room batch aggregation behind `/most-watch`
    pub most_watch: Arc<MostWatchService>,
    /// Paid-live summary behind `/premium-lives`
    pub live_history: Arc<LiveHistoryService>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last request failure, reported by `/health`
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(most_watch: MostWatchService, live_history: LiveHistoryService) -> Self {
        Self {
            most_watch: Arc::new(most_watch),
            live_history: Arc::new(live_history),
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Wire the services to the real upstream site
    pub fn from_config(
        config: &TomlConfig,
        dataset: RoomDataset,
        trainees: TraineeIdSet,
        setlists: SetlistCatalog,
    ) -> Result<Self, FetchError> {
        let client = Arc::new(ShowroomClient::new(&config.upstream)?);
        let images = Arc::new(HttpImageEncoder::new(&config.upstream)?);
        info!(upstream = client.base_url(), "Upstream client ready");

        let most_watch = MostWatchService::new(
            Arc::new(dataset),
            Arc::new(trainees),
            client.clone(),
            images.clone(),
            BatchSettings::from(&config.upstream),
        );
        let live_history = LiveHistoryService::new(
            client,
            images,
            Arc::new(setlists),
            config.shows.clone(),
            config.currency.clone(),
        );

        Ok(Self::new(most_watch, live_history))
    }

    /// Remember a failure for `/health`
    pub async fn record_error(&self, err: &ApiError) {
        *self.last_error.write().await = Some(err.to_string());
    }
}

/// Build application router
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let mut router = Router::new()
        .merge(api::welcome_routes())
        .merge(api::health_routes())
        .merge(api::wrapped_routes());

    if let Some(dir) = &server.static_dir {
        info!(dir = %dir.display(), "Serving static files");
        router = router.fallback_service(ServeDir::new(dir));
    }

    let router = router.with_state(state).layer(TraceLayer::new_for_http());

    if server.cors_permissive {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}
