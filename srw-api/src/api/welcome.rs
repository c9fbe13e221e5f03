//! Root greeting

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

pub const WELCOME_MESSAGE: &str = "Welcome to JKT48 Showroom Wrapped";

#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: String,
}

/// GET /
pub async fn welcome() -> Json<WelcomeResponse> {
    Json(WelcomeResponse {
        message: WELCOME_MESSAGE.to_string(),
    })
}

pub fn welcome_routes() -> Router<AppState> {
    Router::new().route("/", get(welcome))
}
