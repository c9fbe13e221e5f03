//! Wrapped endpoints
//!
//! - `POST /most-watch`: rooms sorted by estimated 2024 visits
//! - `POST /premium-lives`: paid-live spend summary
//!
//! Both take `{ "token": "<cookie header>" }`. A missing token, or a body that
//! is not JSON at all, is sent upstream as an empty cookie.

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::info;

use crate::services::{PremiumLiveSummary, ProcessedRoom};
use crate::{ApiError, ApiResult, AppState};

/// Request body shared by both endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub token: Option<String>,
}

impl TokenRequest {
    pub fn token(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }
}

fn request_body(body: Option<Json<TokenRequest>>) -> TokenRequest {
    body.map(|Json(request)| request).unwrap_or_default()
}

/// POST /most-watch
pub async fn most_watch(
    State(state): State<AppState>,
    body: Option<Json<TokenRequest>>,
) -> Json<Vec<ProcessedRoom>> {
    let request = request_body(body);
    info!(has_token = request.token.is_some(), "Most-watch requested");

    Json(state.most_watch.most_watched(request.token()).await)
}

/// POST /premium-lives
pub async fn premium_lives(
    State(state): State<AppState>,
    body: Option<Json<TokenRequest>>,
) -> ApiResult<Json<PremiumLiveSummary>> {
    let request = request_body(body);
    info!(has_token = request.token.is_some(), "Premium-lives requested");

    match state.live_history.summarize(request.token()).await {
        Ok(summary) => Ok(Json(summary)),
        Err(e) => {
            let err = ApiError::from(e);
            state.record_error(&err).await;
            Err(err)
        }
    }
}

pub fn wrapped_routes() -> Router<AppState> {
    Router::new()
        .route("/most-watch", post(most_watch))
        .route("/premium-lives", post(premium_lives))
}
